//! Benchmark parameter types and fixtures.

use std::fmt;

use isosweep_core::{
    ConnectivityGuard, Graph, GraphFactory, GraphKind, GraphModel, GraphSpec,
};
use rand::{SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Seed used for every benchmark fixture.
pub const SEED: u64 = 42;

/// Parameters for one generator benchmark.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorBenchParams {
    /// Generator tag.
    pub kind: GraphKind,
    /// Nodes per graph.
    pub nodes: usize,
    /// Density or model parameter.
    pub density: f64,
}

impl GeneratorBenchParams {
    /// Resolves the parameters into a generator.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::Graph`] when the parameters are invalid.
    pub fn factory(&self) -> Result<GraphFactory, BenchSetupError> {
        let model = GraphModel::resolve(&GraphSpec::new(self.kind, self.nodes, self.density))?;
        Ok(GraphFactory::new(model))
    }
}

impl fmt::Display for GeneratorBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},n={},p={}", self.kind, self.nodes, self.density)
    }
}

/// Synthetic generators exercised by the benchmarks. PPI needs network files
/// and is left out.
#[must_use]
pub fn generator_grid(nodes: usize) -> Vec<GeneratorBenchParams> {
    [
        (GraphKind::ErdosRenyi, 0.1),
        (GraphKind::BarabasiAlbert, 0.05),
        (GraphKind::WattsStrogatz, 0.1),
        (GraphKind::Geometric, 0.3),
        (GraphKind::Vazquez, 0.1),
        (GraphKind::ExtendedVazquez, 0.24),
        (GraphKind::Sole, 0.0),
    ]
    .into_iter()
    .map(|(kind, density)| GeneratorBenchParams {
        kind,
        nodes,
        density,
    })
    .collect()
}

/// Builds a connected fixture graph from `params` with the fixed seed.
///
/// # Errors
/// Returns [`BenchSetupError::Graph`] when generation or the guard fails.
pub fn connected_fixture(params: &GeneratorBenchParams) -> Result<Graph, BenchSetupError> {
    let factory = params.factory()?;
    let mut rng = SmallRng::seed_from_u64(SEED);
    let guarded = ConnectivityGuard::default()
        .run(factory.model().label(), || factory.generate(&mut rng))?;
    Ok(guarded.graph)
}
