//! Command-line interface orchestration for isosweep.
//!
//! `run` sweeps an external estimator over generated graph pairs and archives
//! its samples; `inspect` summarises an archive written by an earlier run.

mod commands;
mod estimator;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, InspectCommand, RunCommand, RunSummary, SpacingArg,
    render_summary, run_cli,
};
pub use estimator::ProcessEstimator;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
