//! Unit tests for the sweep driver.

use super::*;
use crate::{
    ArchiveError, GraphErrorCode, GraphKind, GraphSpec, Perturbation, RetryLimit, SweepErrorCode,
};
use isosweep_test_support::tracing::RecordingLayer;
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

/// Returns a fixed trace and optionally rejects or fails on chosen steps.
#[derive(Default)]
struct ScriptedEstimator {
    calls: usize,
    reject_on: Vec<usize>,
    fail_on: Option<usize>,
    dimensions: Vec<(usize, usize)>,
    identical: Vec<bool>,
}

impl Estimator for ScriptedEstimator {
    fn estimate(
        &mut self,
        a: &AdjacencyMatrix,
        b: &AdjacencyMatrix,
        nc: f64,
    ) -> core::result::Result<EstimatorOutput, EstimatorError> {
        let call = self.calls;
        self.calls += 1;
        self.dimensions.push((a.dimension(), b.dimension()));
        self.identical.push(a == b);
        if self.fail_on == Some(call) {
            return Err(EstimatorError::Failed {
                message: "boom".into(),
            });
        }
        if self.reject_on.contains(&call) {
            return Err(EstimatorError::Rejected {
                arguments: vec!["degenerate".into()],
            });
        }
        Ok(EstimatorOutput {
            correctness: vec![0.0, nc, 1.0],
            edge_correctness: nc,
            iterations: 2,
            candidates: 10,
            rejections: 3,
        })
    }
}

#[derive(Default)]
struct MemorySink {
    raws: Vec<RawSnapshot>,
    runs: Vec<RunArtifact>,
}

impl ArchiveSink for MemorySink {
    fn write_raw(&mut self, snapshot: &RawSnapshot) -> core::result::Result<(), ArchiveError> {
        self.raws.push(snapshot.clone());
        Ok(())
    }

    fn write_run(&mut self, artifact: &RunArtifact) -> core::result::Result<(), ArchiveError> {
        self.runs.push(artifact.clone());
        Ok(())
    }
}

#[fixture]
fn er_builder() -> SweepBuilder {
    SweepBuilder::new(GraphSpec::new(GraphKind::ErdosRenyi, 50, 0.1))
        .with_steps(20)
        .with_seed(42)
}

#[rstest]
fn twenty_steps_snapshot_steps_zero_and_ten(er_builder: SweepBuilder) {
    let sweep = Sweep::new(er_builder.build().expect("valid"));
    let mut estimator = ScriptedEstimator::default();
    let mut sink = MemorySink::default();
    let outcome = sweep.run(&mut estimator, &mut sink).expect("sweep succeeds");

    assert_eq!(outcome.steps, 20);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.artifact.sample.len(), 20);
    assert_eq!(outcome.artifact.nc_values, sweep.config().control_values());
    assert_eq!(
        sink.raws.iter().map(|raw| raw.step).collect::<Vec<_>>(),
        vec![0, 10]
    );
    assert_eq!(sink.runs, vec![outcome.artifact.clone()]);
    assert!(outcome.artifact.sample.iter().all(|row| row.len() == 2));
    assert!(estimator.dimensions.iter().all(|&(a, b)| a == 50 && b == 50));
    assert!(estimator.identical.iter().all(|&same| same));
}

#[rstest]
fn rejected_steps_are_skipped_and_logged(er_builder: SweepBuilder) {
    let sweep = Sweep::new(er_builder.build().expect("valid"));
    let mut estimator = ScriptedEstimator {
        reject_on: vec![0, 5],
        ..ScriptedEstimator::default()
    };
    let mut sink = MemorySink::default();
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let outcome = tracing::subscriber::with_default(subscriber, || {
        sweep.run(&mut estimator, &mut sink)
    })
    .expect("rejections are recoverable");

    assert_eq!(outcome.skipped, 2);
    assert_eq!(outcome.artifact.sample.len(), 18);
    assert_eq!(outcome.artifact.ec_values.len(), 18);
    assert_eq!(sink.raws.iter().map(|raw| raw.step).collect::<Vec<_>>(), vec![10]);

    let warnings = layer.events_at(Level::WARN);
    assert_eq!(warnings.len(), 2);
    assert_eq!(layer.count_messages("step 0/20"), 1);

    let runs = layer.spans_named("sweep.run");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].field("skipped"), Some("2"));
    assert_eq!(runs[0].field("accepted"), Some("18"));
    assert_eq!(layer.spans_named("sweep.step").len(), 20);
}

#[rstest]
fn estimator_failures_abort_the_sweep(er_builder: SweepBuilder) {
    let sweep = Sweep::new(er_builder.build().expect("valid"));
    let mut estimator = ScriptedEstimator {
        fail_on: Some(3),
        ..ScriptedEstimator::default()
    };
    let mut sink = MemorySink::default();
    let err = sweep
        .run(&mut estimator, &mut sink)
        .expect_err("failure is fatal");
    assert!(matches!(err, SweepError::Estimator { step: 3, .. }));
    assert!(sink.runs.is_empty());
}

#[rstest]
fn perturbed_matrices_share_the_base_dimension(er_builder: SweepBuilder) {
    let config = er_builder
        .with_perturbation(Perturbation::Thin(0.05))
        .with_steps(5)
        .build()
        .expect("valid");
    let sweep = Sweep::new(config);
    let mut estimator = ScriptedEstimator::default();
    let mut sink = MemorySink::default();
    sweep.run(&mut estimator, &mut sink).expect("sweep succeeds");
    assert_eq!(estimator.dimensions, vec![(50, 50); 5]);
    assert_eq!(sink.runs[0].metadata.ptype, crate::PerturbationKind::Thin);
}

#[rstest]
fn thin_with_zero_magnitude_reproduces_the_base(er_builder: SweepBuilder) {
    let sweep = Sweep::new(
        er_builder
            .with_perturbation(Perturbation::Thin(0.0))
            .build()
            .expect("valid"),
    );
    let mut rng = SmallRng::seed_from_u64(9);
    let matrices = sweep.build_matrices(&mut rng).expect("matrices build");
    assert_eq!(matrices.base, matrices.perturbed);
}

#[rstest]
fn exhausted_guard_is_fatal() {
    let config = SweepBuilder::new(GraphSpec::new(GraphKind::ErdosRenyi, 30, 0.0))
        .with_steps(2)
        .with_seed(1)
        .with_retry_limit(RetryLimit::from_count(3))
        .build()
        .expect("valid");
    let mut estimator = ScriptedEstimator::default();
    let mut sink = MemorySink::default();
    let err = Sweep::new(config)
        .run(&mut estimator, &mut sink)
        .expect_err("an empty graph is never connected");
    assert_eq!(err.code(), SweepErrorCode::Graph);
    assert_eq!(err.graph_code(), Some(GraphErrorCode::ConnectivityExhausted));
    assert_eq!(estimator.calls, 0);
}

#[rstest]
fn seeded_sweeps_are_reproducible(er_builder: SweepBuilder) {
    let config = er_builder.with_steps(3).build().expect("valid");
    let sweep = Sweep::new(config);
    let mut first_rng = SmallRng::seed_from_u64(5);
    let mut second_rng = SmallRng::seed_from_u64(5);
    assert_eq!(
        sweep.build_matrices(&mut first_rng).expect("first"),
        sweep.build_matrices(&mut second_rng).expect("second")
    );
}
