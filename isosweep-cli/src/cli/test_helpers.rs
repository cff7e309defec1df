//! Small helpers shared across CLI tests.
//!
//! Estimators are stood in for by `sh -c` scripts so the tests exercise the
//! real process adapter without a compiled helper binary.

use std::path::PathBuf;

use tempfile::TempDir;

use super::{Cli, CliError, Command, RunCommand, SpacingArg, run_cli};
use isosweep_core::{GraphKind, PerturbationKind, PpiSpecies};

/// Response of an estimator that accepts every step.
pub(super) const ACCEPT: &str = r#"cat >/dev/null; echo '{"correctness":[0.1,0.2,0.3],"ec":0.5,"iters":2,"candidates":4,"rejects":1}'"#;

/// Response of an estimator that rejects every step.
pub(super) const REJECT: &str = r#"cat >/dev/null; echo '{"error":["degenerate","input"]}'"#;

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Builds a small seeded Erdős–Rényi run driven by `script`.
pub(super) fn er_run(dir: &TempDir, script: &str) -> RunCommand {
    RunCommand {
        nodes: 20,
        density: 0.3,
        graph: GraphKind::ErdosRenyi,
        perturbation: PerturbationKind::None,
        magnitude: 0.0,
        species: PpiSpecies::Human,
        steps: 12,
        estimator: PathBuf::from("sh"),
        estimator_args: vec!["-c".to_owned(), script.to_owned()],
        output_dir: dir.path().to_path_buf(),
        seed: Some(7),
        spacing: SpacingArg::Exclusive,
        max_connect_attempts: 10_000,
        snapshot_interval: 10,
        ppi_dir: dir.path().join("ppi-data"),
    }
}

pub(super) fn run_cli_expecting_error(command: RunCommand, panic_msg: &str) -> CliError {
    match run_cli(Cli {
        command: Command::Run(command),
    }) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
