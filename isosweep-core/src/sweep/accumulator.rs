//! Row-per-step accumulation of estimator results.

use crate::{
    archive::{RunArtifact, RunMetadata},
    estimator::EstimatorOutput,
};

/// Collects trailing correctness windows, EC values and control values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleAccumulator {
    sample: Vec<Vec<f64>>,
    ec_values: Vec<f64>,
    nc_values: Vec<f64>,
}

impl SampleAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful step.
    pub fn push(&mut self, output: &EstimatorOutput, nc: f64) {
        self.sample.push(output.trailing_window().to_vec());
        self.ec_values.push(output.edge_correctness);
        self.nc_values.push(nc);
    }

    /// Returns the number of recorded rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sample.len()
    }

    /// Returns whether no row has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sample.is_empty()
    }

    /// Consumes the accumulator into a run artifact.
    #[must_use]
    pub fn into_artifact(self, metadata: RunMetadata) -> RunArtifact {
        RunArtifact {
            sample: self.sample,
            ec_values: self.ec_values,
            nc_values: self.nc_values,
            metadata,
        }
    }
}
