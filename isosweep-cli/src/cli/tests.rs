//! Unit tests for the CLI commands and the process estimator.

use super::commands::{build_sweep, run_command};
use super::test_helpers::{ACCEPT, REJECT, er_run, run_cli_expecting_error, temp_dir};
use super::{
    Cli, CliError, Command, ExecutionSummary, InspectCommand, ProcessEstimator, SpacingArg,
    render_summary, run_cli,
};

use std::time::Duration;

use clap::Parser;
use isosweep_core::{
    Archive, ControlSpacing, Estimator, EstimatorError, Graph, GraphErrorCode, GraphKind,
    PerturbationKind, PpiSpecies, RetryLimit, SweepError, Timing,
};
use isosweep_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
fn positional_arguments_take_their_defaults() -> TestResult {
    let cli = Cli::try_parse_from([
        "isosweep",
        "run",
        "50",
        "0.1",
        "ER",
        "thin",
        "--estimator",
        "estimate",
    ])?;
    let Command::Run(run) = cli.command else {
        panic!("expected the run command");
    };
    assert_eq!(run.nodes, 50);
    assert_eq!(run.graph, GraphKind::ErdosRenyi);
    assert_eq!(run.perturbation, PerturbationKind::Thin);
    assert_eq!(run.magnitude, 0.0);
    assert_eq!(run.species, PpiSpecies::Human);
    assert_eq!(run.steps, 500);
    assert_eq!(run.spacing, SpacingArg::Exclusive);
    assert_eq!(run.max_connect_attempts, 10_000);
    assert_eq!(run.snapshot_interval, 10);
    assert_eq!(run.output_dir.to_str(), Some("."));
    assert_eq!(run.ppi_dir.to_str(), Some("ppi-data"));
    assert!(run.estimator_args.is_empty());
    Ok(())
}

#[rstest]
fn every_positional_and_option_is_parsed() -> TestResult {
    let cli = Cli::try_parse_from([
        "isosweep",
        "run",
        "100",
        "0.24",
        "VZ",
        "rewire",
        "0.3",
        "yeast",
        "40",
        "--estimator",
        "estimate",
        "--estimator-arg",
        "--fast",
        "--estimator-arg",
        "2",
        "--seed",
        "9",
        "--spacing",
        "inclusive",
        "--max-connect-attempts",
        "0",
    ])?;
    let Command::Run(run) = cli.command else {
        panic!("expected the run command");
    };
    assert_eq!(run.species, PpiSpecies::Yeast);
    assert_eq!(run.steps, 40);
    assert_eq!(run.estimator_args, vec!["--fast", "2"]);
    assert_eq!(run.seed, Some(9));

    let sweep = build_sweep(&run)?;
    let config = sweep.config();
    assert_eq!(config.spacing(), ControlSpacing::Inclusive);
    assert_eq!(config.retry_limit(), RetryLimit::Unbounded);
    assert_eq!(config.perturbation().kind(), PerturbationKind::Rewire);
    Ok(())
}

#[rstest]
#[case::unknown_graph(&["isosweep", "run", "50", "0.1", "XX", "thin", "--estimator", "e"])]
#[case::unknown_perturbation(&["isosweep", "run", "50", "0.1", "ER", "shuffle", "--estimator", "e"])]
#[case::unknown_species(&["isosweep", "run", "50", "0.1", "PPI", "thin", "0", "cat", "--estimator", "e"])]
#[case::missing_estimator(&["isosweep", "run", "50", "0.1", "ER", "thin", "0.1", "human", "10"])]
fn invalid_arguments_are_rejected_by_the_parser(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args.iter().copied()).is_err());
}

#[cfg(unix)]
#[rstest]
fn run_writes_archives_and_renders_a_summary() -> TestResult {
    let dir = temp_dir();
    let summary = run_command(er_run(&dir, ACCEPT))?;

    assert!(summary.run_path.is_file());
    assert_eq!(summary.outcome.steps, 12);
    assert_eq!(summary.outcome.skipped, 0);
    assert_eq!(summary.outcome.artifact.sample.len(), 12);
    assert!(
        summary
            .outcome
            .artifact
            .sample
            .iter()
            .all(|row| row == &vec![0.2, 0.3])
    );
    let raws = std::fs::read_dir(dir.path().join("noperturb/ER/raw"))?.count();
    assert_eq!(raws, 2);

    let mut rendered = Vec::new();
    render_summary(&ExecutionSummary::Run(summary.clone()), &mut rendered)?;
    let text = String::from_utf8(rendered)?;
    assert!(text.contains("steps: 12 (accepted 12, skipped 0)"));
    assert!(text.contains("wall time: "));
    assert!(text.contains("time per step: "));

    let inspected = run_cli(Cli {
        command: Command::Inspect(InspectCommand {
            archive: summary.run_path.clone(),
        }),
    })?;
    let mut rendered = Vec::new();
    render_summary(&inspected, &mut rendered)?;
    let text = String::from_utf8(rendered)?;
    assert!(text.contains("kind: run"));
    assert!(text.contains("rows: 12"));
    assert!(text.contains("graph: ER n=20 p=0.3"));
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn rejected_steps_still_produce_a_run_artifact() -> TestResult {
    let dir = temp_dir();
    let summary = run_command(er_run(&dir, REJECT))?;
    assert_eq!(summary.outcome.skipped, 12);
    assert!(summary.outcome.artifact.sample.is_empty());
    assert!(summary.run_path.is_file());
    assert!(!dir.path().join("noperturb/ER/raw").exists());
    Ok(())
}

#[cfg(unix)]
#[rstest]
#[case::non_zero_exit("cat >/dev/null; exit 3")]
#[case::malformed_output("cat >/dev/null; echo not-json")]
fn estimator_failures_abort_the_run(#[case] script: &str) {
    let dir = temp_dir();
    let err = run_cli_expecting_error(er_run(&dir, script), "estimator failure is fatal");
    assert!(matches!(
        err,
        CliError::Sweep(SweepError::Estimator { step: 0, .. })
    ));
    assert_eq!(err.code(), Some("SWEEP_ESTIMATOR_FAILURE"));
    assert!(!dir.path().join("noperturb").exists());
}

#[rstest]
#[case::magnitude_out_of_range(
    PerturbationKind::Thin,
    1.5,
    GraphKind::ErdosRenyi,
    0.3,
    GraphErrorCode::InvalidMagnitude
)]
#[case::unmapped_duplication(
    PerturbationKind::None,
    0.0,
    GraphKind::Vazquez,
    0.5,
    GraphErrorCode::UnmappedDuplicationParameter
)]
fn misconfiguration_is_reported_with_graph_codes(
    #[case] perturbation: PerturbationKind,
    #[case] magnitude: f64,
    #[case] graph: GraphKind,
    #[case] density: f64,
    #[case] expected: GraphErrorCode,
) {
    let dir = temp_dir();
    let mut command = er_run(&dir, "exit 1");
    command.perturbation = perturbation;
    command.magnitude = magnitude;
    command.graph = graph;
    command.density = density;
    let err = run_cli_expecting_error(command, "configuration is invalid");
    assert_eq!(err.graph_code(), Some(expected));
}

#[cfg(unix)]
#[rstest]
fn run_cli_records_the_command_span() -> TestResult {
    let dir = temp_dir();
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        run_cli(Cli {
            command: Command::Run(er_run(&dir, ACCEPT)),
        })
    })?;

    let spans = layer.spans_named("cli.run");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].field("command"), Some("run"));
    assert_eq!(layer.count_messages("command completed"), 1);
    assert_eq!(layer.spans_named("estimator.process").len(), 12);
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn process_estimator_sends_both_matrices_and_the_control_value() {
    let matrix = Graph::from_edges(2, [(0, 1)]).to_adjacency_matrix();
    let script = r#"if grep -q '"a":\[\[0,1\],\[1,0\]\],"b":\[\[0,1\],\[1,0\]\],"nc":0.5'; then
  echo '{"correctness":[1.0],"ec":1.0,"iters":1,"candidates":2,"rejects":0}'
else
  echo '{"error":["unexpected request"]}'
fi"#;
    let mut estimator = ProcessEstimator::new("sh").with_args(["-c", script]);
    let output = estimator
        .estimate(&matrix, &matrix, 0.5)
        .expect("request matches");
    assert_eq!(output.candidates, 2);
    assert_eq!(output.edge_correctness, 1.0);
}

#[cfg(unix)]
#[rstest]
fn process_estimator_maps_error_responses_to_rejections() {
    let matrix = Graph::from_edges(2, [(0, 1)]).to_adjacency_matrix();
    let mut estimator = ProcessEstimator::new("sh").with_args(["-c", REJECT]);
    let err = estimator
        .estimate(&matrix, &matrix, 0.1)
        .expect_err("the script rejects");
    assert_eq!(
        err,
        EstimatorError::Rejected {
            arguments: vec!["degenerate".to_owned(), "input".to_owned()]
        }
    );
}

#[rstest]
fn missing_estimator_programs_fail() {
    let dir = temp_dir();
    let matrix = Graph::from_edges(2, [(0, 1)]).to_adjacency_matrix();
    let mut estimator = ProcessEstimator::new(dir.path().join("no-such-estimator"));
    let err = estimator
        .estimate(&matrix, &matrix, 0.1)
        .expect_err("the program does not exist");
    assert!(matches!(err, EstimatorError::Failed { .. }));
}

#[cfg(unix)]
#[rstest]
fn render_summary_reports_missing_cpu_time() -> TestResult {
    let dir = temp_dir();
    let mut summary = run_command(er_run(&dir, ACCEPT))?;
    summary.outcome.timing = Timing {
        wall: Duration::from_millis(1200),
        cpu: None,
    };
    let mut rendered = Vec::new();
    render_summary(&ExecutionSummary::Run(summary), &mut rendered)?;
    let text = String::from_utf8(rendered)?;
    assert!(text.contains("wall time: 1.200s"));
    assert!(text.contains("cpu time: unavailable"));
    assert!(text.contains("time per step: 0.100s"));
    Ok(())
}

#[rstest]
fn inspect_reports_unreadable_archives() {
    let dir = temp_dir();
    let err = run_cli(Cli {
        command: Command::Inspect(InspectCommand {
            archive: dir.path().join("missing.json.gz"),
        }),
    })
    .expect_err("archive does not exist");
    assert!(matches!(err, CliError::Archive(_)));
    assert_eq!(err.code(), None);
}

#[rstest]
fn inspect_decodes_raw_snapshots() -> TestResult {
    let dir = temp_dir();
    let path = dir.path().join("raw.json.gz");
    let snapshot = isosweep_core::RawSnapshot {
        step: 10,
        correctness: vec![0.5],
        ec: 0.25,
        nc: 0.5,
        metadata: isosweep_core::RunMetadata {
            n: 8,
            p: 0.2,
            gtype: GraphKind::Ppi,
            ppitype: PpiSpecies::Fly,
            ptype: PerturbationKind::Scramble,
            parg: 0.1,
        },
    };
    isosweep_core::write_archive(&path, &Archive::Raw(snapshot))?;
    let summary = run_cli(Cli {
        command: Command::Inspect(InspectCommand { archive: path }),
    })?;
    let mut rendered = Vec::new();
    render_summary(&summary, &mut rendered)?;
    let text = String::from_utf8(rendered)?;
    assert!(text.contains("kind: raw"));
    assert!(text.contains("step: 10"));
    assert!(text.contains("species: fly"));
    assert!(text.contains("perturbation: scramble 0.1"));
    Ok(())
}
