//! Error types for the isosweep core library.
//!
//! Every public error enum carries a stable machine-readable code so the CLI
//! can report failures in structured logs.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Errors raised while resolving, generating, guarding or perturbing graphs.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// The graph-type tag did not name a supported generator.
    #[error("invalid graph type `{tag}`")]
    UnknownGraphKind {
        /// Tag supplied by the caller.
        tag: String,
    },
    /// The species tag did not name a supported interaction network.
    #[error("invalid PPI species `{tag}`")]
    UnknownSpecies {
        /// Tag supplied by the caller.
        tag: String,
    },
    /// The perturbation tag did not name a supported transformation.
    #[error("invalid perturbation type `{tag}`")]
    UnknownPerturbation {
        /// Tag supplied by the caller.
        tag: String,
    },
    /// A duplication-divergence model was asked for a `p` with no registered `q`.
    #[error("duplication parameter p={p} has no registered q (expected 0.1 or 0.24)")]
    UnmappedDuplicationParameter {
        /// The rejected primary parameter.
        p: f64,
    },
    /// A generator parameter was outside its valid domain.
    #[error("invalid value {value} for `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Value supplied by the caller.
        value: f64,
        /// Human-readable constraint that was violated.
        reason: &'static str,
    },
    /// A perturbation magnitude was outside its valid range.
    #[error("invalid magnitude {magnitude} for `{perturbation}` perturbation")]
    InvalidMagnitude {
        /// Perturbation tag.
        perturbation: &'static str,
        /// Magnitude supplied by the caller.
        magnitude: f64,
    },
    /// A generator gave up after its own internal retry budget.
    #[error("`{model}` generation failed after {attempts} attempts")]
    GenerationFailed {
        /// Generator label.
        model: &'static str,
        /// Attempts performed before giving up.
        attempts: usize,
    },
    /// The connectivity guard exhausted its retry limit.
    #[error("no connected `{model}` graph after {attempts} attempts")]
    ConnectivityExhausted {
        /// Label of the graph being guarded.
        model: &'static str,
        /// Attempts performed before giving up.
        attempts: usize,
    },
    /// An interaction network could not be read.
    #[error("failed to read PPI network `{path}`: {source}")]
    PpiIo {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An interaction network line could not be parsed.
    #[error("malformed PPI edge on line {line} of `{path}`")]
    PpiMalformed {
        /// Path of the network file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
    },
    /// The sampled component was smaller than the requested node count.
    #[error("PPI component has {available} nodes but {requested} were requested")]
    PpiTooSmall {
        /// Nodes reachable from the sampled seed.
        available: usize,
        /// Nodes requested by the caller.
        requested: usize,
    },
    /// A PPI graph was requested but no interaction source was configured.
    #[error("no PPI source configured")]
    PpiSourceMissing,
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The graph-type tag did not name a supported generator.
        UnknownGraphKind => UnknownGraphKind { .. } => "GRAPH_UNKNOWN_KIND",
        /// The species tag was not recognised.
        UnknownSpecies => UnknownSpecies { .. } => "GRAPH_UNKNOWN_SPECIES",
        /// The perturbation tag was not recognised.
        UnknownPerturbation => UnknownPerturbation { .. } => "GRAPH_UNKNOWN_PERTURBATION",
        /// A duplication-divergence `p` had no registered `q`.
        UnmappedDuplicationParameter => UnmappedDuplicationParameter { .. } => "GRAPH_UNMAPPED_DUPLICATION_PARAMETER",
        /// A generator parameter was outside its valid domain.
        InvalidParameter => InvalidParameter { .. } => "GRAPH_INVALID_PARAMETER",
        /// A perturbation magnitude was outside its valid range.
        InvalidMagnitude => InvalidMagnitude { .. } => "GRAPH_INVALID_MAGNITUDE",
        /// A generator exhausted its internal retries.
        GenerationFailed => GenerationFailed { .. } => "GRAPH_GENERATION_FAILED",
        /// The connectivity guard exhausted its retry limit.
        ConnectivityExhausted => ConnectivityExhausted { .. } => "GRAPH_CONNECTIVITY_EXHAUSTED",
        /// An interaction network could not be read.
        PpiIo => PpiIo { .. } => "GRAPH_PPI_IO",
        /// An interaction network line could not be parsed.
        PpiMalformed => PpiMalformed { .. } => "GRAPH_PPI_MALFORMED",
        /// The sampled component was too small.
        PpiTooSmall => PpiTooSmall { .. } => "GRAPH_PPI_TOO_SMALL",
        /// No interaction source was configured.
        PpiSourceMissing => PpiSourceMissing => "GRAPH_PPI_SOURCE_MISSING",
    }
}

/// Errors raised while writing or reading persisted archives.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// File system access failed.
    #[error("archive I/O failed for `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The bundle could not be encoded or decoded.
    #[error("archive encoding failed for `{path}`: {source}")]
    Encoding {
        /// Path of the archive.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while configuring or running a sweep.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SweepError {
    /// The sweep must perform at least one step.
    #[error("steps must be at least 1 (got {got})")]
    InvalidSteps {
        /// The rejected step count.
        got: usize,
    },
    /// Snapshots must be taken at a positive interval.
    #[error("snapshot interval must be at least 1 (got {got})")]
    InvalidSnapshotInterval {
        /// The rejected interval.
        got: usize,
    },
    /// Graph resolution, generation or perturbation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Persisting an artifact failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// The estimator failed in a way the sweep cannot recover from.
    #[error("estimator failed at step {step}: {message}")]
    Estimator {
        /// Zero-based step index.
        step: usize,
        /// Diagnostic reported by the estimator.
        message: String,
    },
    /// The base and comparison matrices disagreed on dimension.
    #[error("adjacency matrices differ in dimension: base={base}, other={other}")]
    MatrixMismatch {
        /// Dimension of the base matrix.
        base: usize,
        /// Dimension of the comparison matrix.
        other: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SweepError`] variants.
    enum SweepErrorCode for SweepError {
        /// The sweep must perform at least one step.
        InvalidSteps => InvalidSteps { .. } => "SWEEP_INVALID_STEPS",
        /// Snapshots must be taken at a positive interval.
        InvalidSnapshotInterval => InvalidSnapshotInterval { .. } => "SWEEP_INVALID_SNAPSHOT_INTERVAL",
        /// Graph resolution, generation or perturbation failed.
        Graph => Graph(..) => "SWEEP_GRAPH_FAILURE",
        /// Persisting an artifact failed.
        Archive => Archive(..) => "SWEEP_ARCHIVE_FAILURE",
        /// The estimator failed fatally.
        Estimator => Estimator { .. } => "SWEEP_ESTIMATOR_FAILURE",
        /// The adjacency matrices disagreed on dimension.
        MatrixMismatch => MatrixMismatch { .. } => "SWEEP_MATRIX_MISMATCH",
    }
}

impl SweepError {
    /// Retrieve the inner [`GraphErrorCode`] when the failure originated in graph handling.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the sweep API.
pub type Result<T> = core::result::Result<T, SweepError>;
