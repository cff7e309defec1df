//! `isosweep` binary.
//!
//! `isosweep run` generates one graph pair per control value, hands both
//! adjacency matrices to the external estimator program and archives the
//! samples under `--output-dir`. `isosweep inspect` decodes an archive.
//! Stdout carries only the run or archive summary; diagnostics go to stderr
//! through `tracing`. Any failure exits non-zero after logging its stable
//! error code.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use isosweep_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Runs the parsed command and writes its summary to stdout.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, graph_code) = err
            .downcast_ref::<CliError>()
            .map_or((None, None), |cli_error| {
                (cli_error.code(), cli_error.graph_code())
            });

        error!(
            error = %err,
            code = code.map(field::display),
            graph_code = graph_code.map(|code| field::display(code.as_str())),
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists to carry this message"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
