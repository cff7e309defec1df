//! Builder utilities for configuring sweeps.
//!
//! Validation happens in [`SweepBuilder::build`], before any graph is
//! generated or any estimator is spawned.

use std::num::NonZeroUsize;

use crate::{
    Result,
    archive::RunMetadata,
    connectivity::RetryLimit,
    error::SweepError,
    generators::{GraphModel, GraphSpec},
    perturb::Perturbation,
};

use super::spacing::{ControlSpacing, control_values};

/// Steps run when none are configured.
pub const DEFAULT_STEPS: usize = 500;
/// Raw snapshots are taken every this many steps by default.
pub const DEFAULT_SNAPSHOT_INTERVAL: usize = 10;

/// Configures and validates a [`SweepConfig`].
///
/// # Examples
/// ```
/// use isosweep_core::{GraphKind, GraphSpec, Perturbation, SweepBuilder};
///
/// let config = SweepBuilder::new(GraphSpec::new(GraphKind::ErdosRenyi, 50, 0.1))
///     .with_perturbation(Perturbation::Thin(0.1))
///     .with_steps(20)
///     .with_seed(7)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.steps().get(), 20);
/// assert_eq!(config.control_values().len(), 20);
/// ```
#[derive(Clone, Debug)]
pub struct SweepBuilder {
    graph: GraphSpec,
    perturbation: Perturbation,
    steps: usize,
    spacing: ControlSpacing,
    seed: Option<u64>,
    retry_limit: RetryLimit,
    snapshot_interval: usize,
}

impl SweepBuilder {
    /// Creates a builder for `graph` with default parameters.
    #[must_use]
    pub fn new(graph: GraphSpec) -> Self {
        Self {
            graph,
            perturbation: Perturbation::None,
            steps: DEFAULT_STEPS,
            spacing: ControlSpacing::default(),
            seed: None,
            retry_limit: RetryLimit::default(),
            snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
        }
    }

    /// Sets the perturbation applied to derive the comparison graph.
    #[must_use]
    pub const fn with_perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    /// Sets the number of sweep steps.
    #[must_use]
    pub const fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Returns the configured step count.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Selects how control values are spaced.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: ControlSpacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Fixes the RNG seed; without one the sweep seeds from entropy.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bounds how many graphs the connectivity guard may discard.
    #[must_use]
    pub const fn with_retry_limit(mut self, limit: RetryLimit) -> Self {
        self.retry_limit = limit;
        self
    }

    /// Sets how often raw snapshots are written.
    #[must_use]
    pub const fn with_snapshot_interval(mut self, interval: usize) -> Self {
        self.snapshot_interval = interval;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`SweepError::InvalidSteps`] for zero steps,
    /// [`SweepError::InvalidSnapshotInterval`] for a zero interval and
    /// [`SweepError::Graph`] when the graph parameters do not resolve or
    /// the perturbation magnitude is out of range.
    pub fn build(self) -> Result<SweepConfig> {
        let steps =
            NonZeroUsize::new(self.steps).ok_or(SweepError::InvalidSteps { got: self.steps })?;
        let snapshot_interval = NonZeroUsize::new(self.snapshot_interval).ok_or(
            SweepError::InvalidSnapshotInterval {
                got: self.snapshot_interval,
            },
        )?;
        let model = GraphModel::resolve(&self.graph)?;
        let perturbation =
            Perturbation::new(self.perturbation.kind(), self.perturbation.magnitude())?;
        Ok(SweepConfig {
            graph: self.graph,
            model,
            perturbation,
            steps,
            spacing: self.spacing,
            seed: self.seed,
            retry_limit: self.retry_limit,
            snapshot_interval,
        })
    }
}

/// A validated sweep configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    graph: GraphSpec,
    model: GraphModel,
    perturbation: Perturbation,
    steps: NonZeroUsize,
    spacing: ControlSpacing,
    seed: Option<u64>,
    retry_limit: RetryLimit,
    snapshot_interval: NonZeroUsize,
}

impl SweepConfig {
    /// Returns the raw graph parameters.
    #[must_use]
    pub const fn graph(&self) -> &GraphSpec {
        &self.graph
    }

    /// Returns the resolved generator.
    #[must_use]
    pub const fn model(&self) -> &GraphModel {
        &self.model
    }

    /// Returns the perturbation.
    #[must_use]
    pub const fn perturbation(&self) -> Perturbation {
        self.perturbation
    }

    /// Returns the step count.
    #[must_use]
    pub const fn steps(&self) -> NonZeroUsize {
        self.steps
    }

    /// Returns the control-value spacing.
    #[must_use]
    pub const fn spacing(&self) -> ControlSpacing {
        self.spacing
    }

    /// Returns the fixed seed, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the connectivity retry limit.
    #[must_use]
    pub const fn retry_limit(&self) -> RetryLimit {
        self.retry_limit
    }

    /// Returns the raw snapshot interval.
    #[must_use]
    pub const fn snapshot_interval(&self) -> NonZeroUsize {
        self.snapshot_interval
    }

    /// Returns one control value per step.
    #[must_use]
    pub fn control_values(&self) -> Vec<f64> {
        control_values(self.steps.get(), self.spacing)
    }

    /// Returns the metadata recorded in every archive of this sweep.
    #[must_use]
    pub fn metadata(&self) -> RunMetadata {
        RunMetadata {
            n: self.graph.nodes,
            p: self.graph.density,
            gtype: self.graph.kind,
            ppitype: self.graph.species,
            ptype: self.perturbation.kind(),
            parg: self.perturbation.magnitude(),
        }
    }
}
