//! The contract between the sweep and an approximate-isomorphism estimator.
//!
//! The estimator itself is an external collaborator. The sweep hands it two
//! index-aligned adjacency matrices and a control value and receives a
//! correctness trace plus summary statistics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::AdjacencyMatrix;

/// Statistics returned by one successful estimator call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorOutput {
    /// Per-iteration correctness indicators.
    pub correctness: Vec<f64>,
    /// Edge correctness of the final matching.
    #[serde(rename = "ec")]
    pub edge_correctness: f64,
    /// Number of trailing trace entries to keep; `0` keeps everything.
    #[serde(rename = "iters")]
    pub iterations: usize,
    /// Candidate moves proposed.
    pub candidates: u64,
    /// Candidate moves rejected.
    #[serde(rename = "rejects")]
    pub rejections: u64,
}

impl EstimatorOutput {
    /// Returns the trailing `iterations` entries of the trace.
    ///
    /// The whole trace is returned when `iterations` is `0` or at least the
    /// trace length.
    ///
    /// # Examples
    /// ```
    /// use isosweep_core::EstimatorOutput;
    ///
    /// let output = EstimatorOutput {
    ///     correctness: vec![0.0, 0.5, 1.0],
    ///     iterations: 2,
    ///     ..EstimatorOutput::default()
    /// };
    /// assert_eq!(output.trailing_window(), &[0.5, 1.0]);
    /// ```
    #[must_use]
    pub fn trailing_window(&self) -> &[f64] {
        let len = self.correctness.len();
        if self.iterations == 0 || self.iterations >= len {
            return &self.correctness;
        }
        self.correctness
            .get(len.saturating_sub(self.iterations)..)
            .unwrap_or(&self.correctness)
    }
}

/// Failures reported by an estimator.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimatorError {
    /// The estimator refused the input; the sweep logs and skips the step.
    #[error("estimator rejected the input: {}", .arguments.join(", "))]
    Rejected {
        /// Diagnostic arguments reported by the estimator.
        arguments: Vec<String>,
    },
    /// The estimator could not be run; the sweep aborts.
    #[error("estimator failed: {message}")]
    Failed {
        /// Human-readable cause.
        message: String,
    },
}

/// An approximate graph-isomorphism estimator.
pub trait Estimator {
    /// Estimates the correctness of aligning `a` with `b` at control `nc`.
    ///
    /// # Errors
    /// Returns [`EstimatorError::Rejected`] for degenerate input the sweep
    /// may skip, and [`EstimatorError::Failed`] for anything else.
    fn estimate(
        &mut self,
        a: &AdjacencyMatrix,
        b: &AdjacencyMatrix,
        nc: f64,
    ) -> Result<EstimatorOutput, EstimatorError>;
}

impl<E: Estimator + ?Sized> Estimator for &mut E {
    fn estimate(
        &mut self,
        a: &AdjacencyMatrix,
        b: &AdjacencyMatrix,
        nc: f64,
    ) -> Result<EstimatorOutput, EstimatorError> {
        (**self).estimate(a, b, nc)
    }
}

impl<E: Estimator + ?Sized> Estimator for Box<E> {
    fn estimate(
        &mut self,
        a: &AdjacencyMatrix,
        b: &AdjacencyMatrix,
        nc: f64,
    ) -> Result<EstimatorOutput, EstimatorError> {
        (**self).estimate(a, b, nc)
    }
}
