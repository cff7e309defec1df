//! Perturbation cost benchmarks on a fixed connected base graph.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};

use isosweep_benches::{
    error::BenchSetupError,
    params::{GeneratorBenchParams, SEED, connected_fixture},
};
use isosweep_core::{GraphKind, Perturbation, PerturbationKind};

/// Magnitude applied by every perturbation.
const MAGNITUDE: f64 = 0.1;

fn perturb_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("perturb");
    group.sample_size(30);

    let base = connected_fixture(&GeneratorBenchParams {
        kind: GraphKind::BarabasiAlbert,
        nodes: 500,
        density: 0.01,
    })?;

    for kind in PerturbationKind::ALL {
        let perturbation = Perturbation::new(kind, MAGNITUDE)?;
        group.bench_with_input(
            BenchmarkId::from_parameter(kind),
            &perturbation,
            |b, perturbation| {
                let mut rng = SmallRng::seed_from_u64(SEED);
                b.iter(|| perturbation.apply(&base, &mut rng));
            },
        );
    }

    group.finish();
    Ok(())
}

fn perturb(c: &mut Criterion) {
    if let Err(err) = perturb_impl(c) {
        panic!("perturb benchmark setup failed: {err}");
    }
}

criterion_group!(benches, perturb);
criterion_main!(benches);
