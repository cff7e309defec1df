//! Command implementations and argument parsing for the isosweep CLI.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use isosweep_core::{
    Archive, ArchiveError, ControlSpacing, DEFAULT_CONNECT_ATTEMPTS, DEFAULT_SNAPSHOT_INTERVAL,
    DEFAULT_STEPS, DirectorySink, EdgeListPpiSource, GraphError, GraphErrorCode, GraphKind,
    GraphSpec, Perturbation, PerturbationKind, PpiSpecies, RetryLimit, Sweep, SweepBuilder,
    SweepError, SweepOutcome, read_archive,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::estimator::ProcessEstimator;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "isosweep",
    about = "Sweep a graph-isomorphism estimator over random graph pairs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a sweep and archive its samples.
    Run(RunCommand),
    /// Summarise a persisted archive.
    Inspect(InspectCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Number of nodes per graph.
    #[arg(value_name = "N")]
    pub nodes: usize,

    /// Density or model parameter.
    #[arg(value_name = "P")]
    pub density: f64,

    /// Graph model tag: ER, BA, WS, GEO, VZ, EV, SL or PPI.
    #[arg(value_name = "GTYPE")]
    pub graph: GraphKind,

    /// Perturbation tag: noperturb, thin, rewire, randomize or scramble.
    #[arg(value_name = "PTYPE")]
    pub perturbation: PerturbationKind,

    /// Perturbation magnitude.
    #[arg(value_name = "PARG", default_value_t = 0.0)]
    pub magnitude: f64,

    /// Interaction network species for PPI runs.
    #[arg(value_name = "PPITYPE", default_value = "human")]
    pub species: PpiSpecies,

    /// Number of sweep steps.
    #[arg(value_name = "STEPS", default_value_t = DEFAULT_STEPS)]
    pub steps: usize,

    /// Estimator program invoked once per step.
    #[arg(long)]
    pub estimator: PathBuf,

    /// Extra argument passed to the estimator; may be repeated.
    #[arg(long = "estimator-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub estimator_args: Vec<String>,

    /// Root directory for archives.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Seed for the random number generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// How control values are spread over the sweep.
    #[arg(long, value_enum, default_value_t = SpacingArg::Exclusive)]
    pub spacing: SpacingArg,

    /// Graphs the connectivity guard may discard per step; 0 means unbounded.
    #[arg(long, default_value_t = DEFAULT_CONNECT_ATTEMPTS.get())]
    pub max_connect_attempts: usize,

    /// Steps between raw snapshots.
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_INTERVAL)]
    pub snapshot_interval: usize,

    /// Directory holding `<species>.txt` interaction edge lists.
    #[arg(long, default_value = "ppi-data")]
    pub ppi_dir: PathBuf,
}

/// Options accepted by the `inspect` command.
#[derive(Debug, Args, Clone)]
pub struct InspectCommand {
    /// Archive to summarise.
    pub archive: PathBuf,
}

/// Command-line spelling of [`ControlSpacing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpacingArg {
    /// Values stop short of 1.
    Exclusive,
    /// The final value is exactly 1.
    Inclusive,
}

impl From<SpacingArg> for ControlSpacing {
    fn from(value: SpacingArg) -> Self {
        match value {
            SpacingArg::Exclusive => Self::Exclusive,
            SpacingArg::Inclusive => Self::Inclusive,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The perturbation arguments were invalid.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Configuring or running the sweep failed.
    #[error(transparent)]
    Sweep(#[from] SweepError),
    /// Reading an archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl CliError {
    /// Returns the stable code of the underlying failure, when it has one.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Graph(error) => Some(error.code().as_str()),
            Self::Sweep(error) => Some(error.code().as_str()),
            Self::Archive(_) => None,
        }
    }

    /// Returns the graph error code, for failures that originated in graph handling.
    #[must_use]
    pub fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            Self::Sweep(error) => error.graph_code(),
            Self::Archive(_) => None,
        }
    }
}

/// Outcome of a `run` command.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Path of the run artifact.
    pub run_path: PathBuf,
    /// Samples, counts and timings reported by the sweep.
    pub outcome: SweepOutcome,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// A completed sweep.
    Run(RunSummary),
    /// A decoded archive.
    Inspect {
        /// Path that was read.
        path: PathBuf,
        /// Decoded bundle.
        archive: Archive,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration or execution fails.
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Run(run) => {
            span.record("command", field::display("run"));
            run_command(run).map(ExecutionSummary::Run)
        }
        Command::Inspect(inspect) => {
            span.record("command", field::display("inspect"));
            inspect_command(&inspect)
        }
    }
}

/// Translates `command` into a validated sweep.
pub(super) fn build_sweep(command: &RunCommand) -> Result<Sweep, CliError> {
    let perturbation = Perturbation::new(command.perturbation, command.magnitude)?;
    let graph =
        GraphSpec::new(command.graph, command.nodes, command.density).with_species(command.species);
    let builder = SweepBuilder::new(graph)
        .with_perturbation(perturbation)
        .with_steps(command.steps)
        .with_spacing(command.spacing.into())
        .with_retry_limit(RetryLimit::from_count(command.max_connect_attempts))
        .with_snapshot_interval(command.snapshot_interval);
    let builder = match command.seed {
        Some(seed) => builder.with_seed(seed),
        None => builder,
    };
    let sweep = Sweep::new(builder.build()?);
    Ok(sweep.with_ppi_source(EdgeListPpiSource::new(command.ppi_dir.clone())))
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(estimator = field::Empty, output_dir = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<RunSummary, CliError> {
    let sweep = build_sweep(&command)?;
    let span = Span::current();
    span.record("estimator", field::display(command.estimator.display()));
    span.record("output_dir", field::display(command.output_dir.display()));

    let mut estimator = ProcessEstimator::new(command.estimator).with_args(command.estimator_args);
    let mut sink = DirectorySink::new(command.output_dir);
    let outcome = sweep.run(&mut estimator, &mut sink).map_err(CliError::Sweep)?;
    let run_path = sink.layout().run_path(&outcome.artifact.metadata);

    info!(
        rows = outcome.artifact.sample.len(),
        skipped = outcome.skipped,
        wall_ms = duration_millis(outcome.timing.wall),
        path = %run_path.display(),
        "command completed"
    );
    Ok(RunSummary { run_path, outcome })
}

#[instrument(name = "cli.inspect", err, skip(command), fields(path = %command.archive.display()))]
pub(super) fn inspect_command(command: &InspectCommand) -> Result<ExecutionSummary, CliError> {
    let archive = read_archive(&command.archive)?;
    Ok(ExecutionSummary::Inspect {
        path: command.archive.clone(),
        archive,
    })
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn seconds(duration: Duration) -> String {
    format!("{:.3}s", duration.as_secs_f64())
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Run(run) => {
            let outcome = &run.outcome;
            writeln!(writer, "run: {}", run.run_path.display())?;
            writeln!(
                writer,
                "steps: {} (accepted {}, skipped {})",
                outcome.steps,
                outcome.artifact.sample.len(),
                outcome.skipped
            )?;
            writeln!(writer, "wall time: {}", seconds(outcome.timing.wall))?;
            match outcome.timing.cpu {
                Some(cpu) => writeln!(writer, "cpu time: {}", seconds(cpu))?,
                None => writeln!(writer, "cpu time: unavailable")?,
            }
            writeln!(
                writer,
                "time per step: {}",
                seconds(outcome.timing.per_step(outcome.steps))
            )?;
        }
        ExecutionSummary::Inspect { path, archive } => {
            writeln!(writer, "archive: {}", path.display())?;
            let metadata = match archive {
                Archive::Run(run) => {
                    writeln!(writer, "kind: run")?;
                    writeln!(writer, "rows: {}", run.sample.len())?;
                    &run.metadata
                }
                Archive::Raw(raw) => {
                    writeln!(writer, "kind: raw")?;
                    writeln!(writer, "step: {}", raw.step)?;
                    writeln!(writer, "nc: {}", raw.nc)?;
                    writeln!(writer, "ec: {}", raw.ec)?;
                    &raw.metadata
                }
            };
            writeln!(
                writer,
                "graph: {} n={} p={}",
                metadata.gtype, metadata.n, metadata.p
            )?;
            if metadata.gtype == GraphKind::Ppi {
                writeln!(writer, "species: {}", metadata.ppitype)?;
            }
            writeln!(
                writer,
                "perturbation: {} {}",
                metadata.ptype, metadata.parg
            )?;
        }
    }
    Ok(())
}
