//! Stable codes carried by the public error types.

use isosweep_core::{GraphError, GraphErrorCode, SweepError, SweepErrorCode};
use rstest::rstest;

#[rstest]
#[case(
    GraphError::UnknownGraphKind { tag: "XX".into() },
    GraphErrorCode::UnknownGraphKind,
    "GRAPH_UNKNOWN_KIND",
)]
#[case(
    GraphError::UnmappedDuplicationParameter { p: 0.5 },
    GraphErrorCode::UnmappedDuplicationParameter,
    "GRAPH_UNMAPPED_DUPLICATION_PARAMETER",
)]
#[case(
    GraphError::InvalidMagnitude { perturbation: "thin", magnitude: 1.5 },
    GraphErrorCode::InvalidMagnitude,
    "GRAPH_INVALID_MAGNITUDE",
)]
#[case(
    GraphError::ConnectivityExhausted { model: "erdos-renyi", attempts: 3 },
    GraphErrorCode::ConnectivityExhausted,
    "GRAPH_CONNECTIVITY_EXHAUSTED",
)]
#[case(
    GraphError::PpiTooSmall { available: 2, requested: 3 },
    GraphErrorCode::PpiTooSmall,
    "GRAPH_PPI_TOO_SMALL",
)]
#[case(GraphError::PpiSourceMissing, GraphErrorCode::PpiSourceMissing, "GRAPH_PPI_SOURCE_MISSING")]
fn returns_expected_graph_code(
    #[case] error: GraphError,
    #[case] expected: GraphErrorCode,
    #[case] wire: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), wire);
    assert_eq!(expected.to_string(), wire);
}

#[rstest]
#[case(SweepError::InvalidSteps { got: 0 }, SweepErrorCode::InvalidSteps, None)]
#[case(
    SweepError::InvalidSnapshotInterval { got: 0 },
    SweepErrorCode::InvalidSnapshotInterval,
    None,
)]
#[case(
    SweepError::Estimator { step: 4, message: "crashed".into() },
    SweepErrorCode::Estimator,
    None,
)]
#[case(
    SweepError::MatrixMismatch { base: 10, other: 9 },
    SweepErrorCode::MatrixMismatch,
    None,
)]
#[case(
    SweepError::from(GraphError::UnknownSpecies { tag: "cat".into() }),
    SweepErrorCode::Graph,
    Some(GraphErrorCode::UnknownSpecies),
)]
fn returns_expected_sweep_code(
    #[case] error: SweepError,
    #[case] expected: SweepErrorCode,
    #[case] graph: Option<GraphErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
    assert_eq!(error.graph_code(), graph);
}

#[rstest]
fn graph_failures_display_transparently() {
    let error = SweepError::from(GraphError::PpiSourceMissing);
    assert_eq!(error.to_string(), "no PPI source configured");
}
