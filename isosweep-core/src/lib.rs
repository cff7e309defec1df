//! Isosweep core library.
//!
//! Builds random graphs under several generative models, keeps them
//! connected, perturbs them, and sweeps an external graph-isomorphism
//! estimator across a range of control values while archiving its output.

mod archive;
mod connectivity;
mod error;
mod estimator;
mod generators;
mod graph;
mod perturb;
mod sampling;
mod sweep;
mod timing;

pub use crate::{
    archive::{
        ARCHIVE_EXTENSION, Archive, ArchiveLayout, ArchiveSink, DirectorySink, RawSnapshot,
        RunArtifact, RunMetadata, format_float, read_archive, write_archive,
    },
    connectivity::{
        ConnectivityGuard, DEFAULT_CONNECT_ATTEMPTS, Guarded, RetryLimit, count_components,
        is_connected,
    },
    error::{ArchiveError, GraphError, GraphErrorCode, Result, SweepError, SweepErrorCode},
    estimator::{Estimator, EstimatorError, EstimatorOutput},
    generators::{
        EXTENDED_LINK_PROBABILITY, EdgeListPpiSource, GEOMETRIC_DIMENSIONS, GraphFactory,
        GraphKind, GraphModel, GraphSpec, PpiSource, PpiSpecies, SOLE_ALPHA, SOLE_DELTA,
        WATTS_STROGATZ_NEIGHBOURS,
    },
    graph::{AdjacencyMatrix, Graph},
    perturb::{Perturbation, PerturbationKind},
    sweep::{
        ControlSpacing, DEFAULT_SNAPSHOT_INTERVAL, DEFAULT_STEPS, SampleAccumulator, StepMatrices,
        Sweep, SweepBuilder, SweepConfig, SweepOutcome, control_values,
    },
    timing::{Stopwatch, Timing, process_cpu_time},
};
