//! Estimator adapter that runs an external program for every step.
//!
//! The program receives one JSON request on stdin:
//!
//! ```text
//! {"a": [[0, 1], [1, 0]], "b": [[0, 1], [1, 0]], "nc": 0.5}
//! ```
//!
//! and answers with either an [`EstimatorOutput`] object or
//! `{"error": ["reason", ...]}` to reject the step.

use std::{
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Stdio},
    thread,
};

use isosweep_core::{AdjacencyMatrix, Estimator, EstimatorError, EstimatorOutput};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Serialize)]
struct EstimatorRequest<'a> {
    a: &'a AdjacencyMatrix,
    b: &'a AdjacencyMatrix,
    nc: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EstimatorResponse {
    Rejected { error: Vec<String> },
    Completed(EstimatorOutput),
}

/// Spawns `program` once per estimate and exchanges JSON over its pipes.
#[derive(Clone, Debug)]
pub struct ProcessEstimator {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessEstimator {
    /// Creates an adapter for `program` with no extra arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends arguments passed to every invocation.
    #[must_use]
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn failed(&self, what: &str, detail: impl std::fmt::Display) -> EstimatorError {
        EstimatorError::Failed {
            message: format!("`{}` {what}: {detail}", self.program.display()),
        }
    }
}

impl Estimator for ProcessEstimator {
    #[instrument(
        name = "estimator.process",
        skip(self, a, b),
        fields(program = %self.program.display(), n = a.dimension()),
    )]
    fn estimate(
        &mut self,
        a: &AdjacencyMatrix,
        b: &AdjacencyMatrix,
        nc: f64,
    ) -> Result<EstimatorOutput, EstimatorError> {
        let request = serde_json::to_vec(&EstimatorRequest { a, b, nc })
            .map_err(|err| self.failed("request could not be encoded", err))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| self.failed("could not be started", err))?;

        let stdin = child.stdin.take();
        let writer = thread::spawn(move || -> io::Result<()> {
            match stdin {
                Some(mut pipe) => pipe.write_all(&request),
                None => Ok(()),
            }
        });
        let output = child
            .wait_with_output()
            .map_err(|err| self.failed("could not be awaited", err))?;
        match writer.join() {
            Ok(Ok(())) => {}
            // The program may answer without reading its input.
            Ok(Err(err)) if err.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(err)) => return Err(self.failed("request could not be sent", err)),
            Err(_) => return Err(self.failed("request writer", "panicked")),
        }

        if !output.status.success() {
            return Err(self.failed("exited unsuccessfully", output.status));
        }
        debug!(bytes = output.stdout.len(), "estimator responded");

        match serde_json::from_slice::<EstimatorResponse>(&output.stdout) {
            Ok(EstimatorResponse::Completed(result)) => Ok(result),
            Ok(EstimatorResponse::Rejected { error }) => {
                Err(EstimatorError::Rejected { arguments: error })
            }
            Err(err) => Err(self.failed("returned malformed output", err)),
        }
    }
}
