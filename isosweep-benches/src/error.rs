//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use isosweep_core::GraphError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Resolving, generating or perturbing a graph failed.
    #[error("graph setup failed: {0}")]
    Graph(#[from] GraphError),
}
