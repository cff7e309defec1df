//! The sweep driver.
//!
//! Each step generates a connected base graph, derives a connected
//! comparison graph, hands both adjacency matrices to the estimator and
//! records the result. Estimator rejections skip the step; every other
//! failure aborts the run.

mod accumulator;
mod builder;
mod spacing;

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{Span, field, info, instrument, warn};

pub use accumulator::SampleAccumulator;
pub use builder::{DEFAULT_SNAPSHOT_INTERVAL, DEFAULT_STEPS, SweepBuilder, SweepConfig};
pub use spacing::{ControlSpacing, control_values};

use crate::{
    Result,
    archive::{ArchiveSink, RawSnapshot, RunArtifact},
    connectivity::ConnectivityGuard,
    error::SweepError,
    estimator::{Estimator, EstimatorError, EstimatorOutput},
    generators::{GraphFactory, PpiSource},
    graph::AdjacencyMatrix,
    timing::{Stopwatch, Timing},
};

/// Result of a completed sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepOutcome {
    /// Aggregated samples; already handed to the sink.
    pub artifact: RunArtifact,
    /// Steps attempted.
    pub steps: usize,
    /// Steps skipped because the estimator rejected their input.
    pub skipped: usize,
    /// Time spent on the whole sweep.
    pub timing: Timing,
}

/// The matrices compared at one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepMatrices {
    /// Base graph.
    pub base: AdjacencyMatrix,
    /// Perturbed graph, or a copy of the base.
    pub perturbed: AdjacencyMatrix,
}

/// Runs a configured sweep.
///
/// # Examples
/// ```
/// use isosweep_core::{
///     AdjacencyMatrix, ArchiveError, ArchiveSink, Estimator, EstimatorError, EstimatorOutput,
///     GraphKind, GraphSpec, RawSnapshot, RunArtifact, Sweep, SweepBuilder,
/// };
///
/// struct Constant;
///
/// impl Estimator for Constant {
///     fn estimate(
///         &mut self,
///         _a: &AdjacencyMatrix,
///         _b: &AdjacencyMatrix,
///         _nc: f64,
///     ) -> Result<EstimatorOutput, EstimatorError> {
///         Ok(EstimatorOutput {
///             correctness: vec![1.0; 4],
///             edge_correctness: 1.0,
///             iterations: 2,
///             ..EstimatorOutput::default()
///         })
///     }
/// }
///
/// #[derive(Default)]
/// struct Discard;
///
/// impl ArchiveSink for Discard {
///     fn write_raw(&mut self, _: &RawSnapshot) -> Result<(), ArchiveError> { Ok(()) }
///     fn write_run(&mut self, _: &RunArtifact) -> Result<(), ArchiveError> { Ok(()) }
/// }
///
/// let config = SweepBuilder::new(GraphSpec::new(GraphKind::ErdosRenyi, 12, 0.6))
///     .with_steps(3)
///     .with_seed(1)
///     .build()
///     .expect("configuration is valid");
/// let outcome = Sweep::new(config)
///     .run(&mut Constant, &mut Discard)
///     .expect("sweep succeeds");
/// assert_eq!(outcome.artifact.sample.len(), 3);
/// assert_eq!(outcome.artifact.sample[0], vec![1.0, 1.0]);
/// ```
#[derive(Debug)]
pub struct Sweep {
    config: SweepConfig,
    factory: GraphFactory,
    guard: ConnectivityGuard,
}

impl Sweep {
    /// Creates a sweep from a validated configuration.
    #[must_use]
    pub fn new(config: SweepConfig) -> Self {
        let factory = GraphFactory::new(*config.model());
        let guard = ConnectivityGuard::new(config.retry_limit());
        Self {
            config,
            factory,
            guard,
        }
    }

    /// Attaches the interaction network source used by PPI runs.
    #[must_use]
    pub fn with_ppi_source(mut self, source: impl PpiSource + 'static) -> Self {
        self.factory = self.factory.with_ppi_source(source);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Builds the guarded base and comparison matrices for one step.
    ///
    /// # Errors
    /// Returns [`SweepError::Graph`] when generation, perturbation or the
    /// connectivity guard fails and [`SweepError::MatrixMismatch`] if the
    /// two matrices differ in size.
    pub fn build_matrices(&self, rng: &mut SmallRng) -> Result<StepMatrices> {
        let model = self.factory.model().label();
        let base = self.guard.run(model, || self.factory.generate(rng))?;
        let perturbation = self.config.perturbation();
        let base_matrix = base.graph.to_adjacency_matrix();
        let perturbed = if perturbation.is_none() {
            base_matrix.clone()
        } else {
            let guarded = self
                .guard
                .run(perturbation.kind().as_str(), || perturbation.apply(&base.graph, rng))?;
            guarded.graph.to_adjacency_matrix()
        };
        if base_matrix.dimension() != perturbed.dimension() {
            return Err(SweepError::MatrixMismatch {
                base: base_matrix.dimension(),
                other: perturbed.dimension(),
            });
        }
        Ok(StepMatrices {
            base: base_matrix,
            perturbed,
        })
    }

    /// Runs every step, persisting snapshots and the final artifact to `sink`.
    ///
    /// # Errors
    /// Returns [`SweepError`] on generator misconfiguration, connectivity
    /// exhaustion, archive failures and non-recoverable estimator failures.
    #[instrument(
        name = "sweep.run",
        err,
        skip(self, estimator, sink),
        fields(
            gtype = %self.config.graph().kind,
            n = self.config.graph().nodes,
            p = self.config.graph().density,
            ptype = %self.config.perturbation().kind(),
            steps = self.config.steps().get(),
            accepted = field::Empty,
            skipped = field::Empty,
        ),
    )]
    pub fn run<E, S>(&self, estimator: &mut E, sink: &mut S) -> Result<SweepOutcome>
    where
        E: Estimator + ?Sized,
        S: ArchiveSink + ?Sized,
    {
        let stopwatch = Stopwatch::start();
        let mut rng = self
            .config
            .seed()
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        let metadata = self.config.metadata();
        let steps = self.config.steps().get();
        let mut accumulator = SampleAccumulator::new();
        let mut skipped = 0_usize;

        for (index, nc) in self.config.control_values().into_iter().enumerate() {
            info!(step = index, steps, "step {index}/{steps}");
            match self.step(index, nc, &mut rng, estimator)? {
                Some(output) => {
                    accumulator.push(&output, nc);
                    if self.is_snapshot_step(index) {
                        sink.write_raw(&RawSnapshot {
                            step: index,
                            correctness: output.correctness,
                            ec: output.edge_correctness,
                            nc,
                            metadata: metadata.clone(),
                        })?;
                    }
                }
                None => skipped = skipped.saturating_add(1),
            }
        }

        let span = Span::current();
        span.record("accepted", accumulator.len());
        span.record("skipped", skipped);

        let artifact = accumulator.into_artifact(metadata);
        sink.write_run(&artifact)?;
        Ok(SweepOutcome {
            artifact,
            steps,
            skipped,
            timing: stopwatch.elapsed(),
        })
    }

    #[instrument(name = "sweep.step", err, skip(self, rng, estimator))]
    fn step<E>(
        &self,
        index: usize,
        nc: f64,
        rng: &mut SmallRng,
        estimator: &mut E,
    ) -> Result<Option<EstimatorOutput>>
    where
        E: Estimator + ?Sized,
    {
        let matrices = self.build_matrices(rng)?;
        match estimator.estimate(&matrices.base, &matrices.perturbed, nc) {
            Ok(output) => {
                info!(rejects = output.rejections, candidates = output.candidates, "estimator finished");
                Ok(Some(output))
            }
            Err(EstimatorError::Rejected { arguments }) => {
                warn!(?arguments, "estimator rejected the step");
                Ok(None)
            }
            Err(EstimatorError::Failed { message }) => Err(SweepError::Estimator {
                step: index,
                message,
            }),
        }
    }

    #[expect(
        clippy::integer_division_remainder_used,
        reason = "snapshots are taken on a fixed stride"
    )]
    const fn is_snapshot_step(&self, index: usize) -> bool {
        index % self.config.snapshot_interval().get() == 0
    }
}

#[cfg(test)]
mod tests;
