//! Persisted run artifacts and raw snapshots.
//!
//! Bundles are gzip-compressed JSON. [`ArchiveLayout`] maps run metadata to
//! the directory tree analysis scripts expect:
//!
//! ```text
//! [ppi/]noperturb/<G>/Run-n<n>-p<p>.json.gz
//! [ppi/]noperturb/<G>/raw/Raw-n<n>-p<p>-nc<nc>.json.gz
//! [ppi/]perturb/<G>/Run-n<n>-p<p>-<ptype>-<parg>.json.gz
//! [ppi/]perturb/<G>/raw/Raw-n<n>-p<p>-nc<nc>-<ptype>-<parg>.json.gz
//! ```

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    error::ArchiveError,
    generators::{GraphKind, PpiSpecies},
    perturb::PerturbationKind,
};

/// File extension shared by every bundle.
pub const ARCHIVE_EXTENSION: &str = "json.gz";

/// Parameters identifying a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Node count.
    pub n: usize,
    /// Density or attachment parameter.
    pub p: f64,
    /// Graph generator tag.
    pub gtype: GraphKind,
    /// Interaction network species; recorded for every run.
    pub ppitype: PpiSpecies,
    /// Perturbation tag.
    pub ptype: PerturbationKind,
    /// Perturbation magnitude.
    pub parg: f64,
}

/// One step's full estimator output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    /// Zero-based step index.
    pub step: usize,
    /// Complete correctness trace.
    pub correctness: Vec<f64>,
    /// Edge correctness.
    pub ec: f64,
    /// Control value.
    pub nc: f64,
    /// Run parameters.
    pub metadata: RunMetadata,
}

/// Aggregated samples of a finished sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunArtifact {
    /// Trailing correctness windows, one row per successful step.
    pub sample: Vec<Vec<f64>>,
    /// Edge correctness per successful step.
    pub ec_values: Vec<f64>,
    /// Control value per successful step.
    pub nc_values: Vec<f64>,
    /// Run parameters.
    pub metadata: RunMetadata,
}

/// Either bundle kind, as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Archive {
    /// Final aggregated artifact.
    Run(RunArtifact),
    /// Intermediate per-step snapshot.
    Raw(RawSnapshot),
}

/// Formats `value` in shortest round-trip form with a trailing `.0` for
/// integral values.
///
/// # Examples
/// ```
/// use isosweep_core::format_float;
///
/// assert_eq!(format_float(0.1), "0.1");
/// assert_eq!(format_float(1.0), "1.0");
/// assert_eq!(format_float(0.24), "0.24");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Maps run metadata onto archive paths under a root directory.
#[derive(Clone, Debug)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    /// Creates a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the output root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run_dir(&self, metadata: &RunMetadata) -> PathBuf {
        let mut dir = self.root.clone();
        let group = if metadata.gtype == GraphKind::Ppi {
            dir.push("ppi");
            metadata.ppitype.as_str()
        } else {
            metadata.gtype.as_str()
        };
        dir.push(if metadata.ptype == PerturbationKind::None {
            "noperturb"
        } else {
            "perturb"
        });
        dir.push(group);
        dir
    }

    fn suffix(metadata: &RunMetadata) -> String {
        if metadata.ptype == PerturbationKind::None {
            String::new()
        } else {
            format!("-{}-{}", metadata.ptype, format_float(metadata.parg))
        }
    }

    /// Returns the path of the final run artifact.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use isosweep_core::{ArchiveLayout, GraphKind, PerturbationKind, PpiSpecies, RunMetadata};
    ///
    /// let metadata = RunMetadata {
    ///     n: 50,
    ///     p: 0.1,
    ///     gtype: GraphKind::ErdosRenyi,
    ///     ppitype: PpiSpecies::Human,
    ///     ptype: PerturbationKind::Thin,
    ///     parg: 0.05,
    /// };
    /// let path = ArchiveLayout::new("out").run_path(&metadata);
    /// assert_eq!(path, Path::new("out/perturb/ER/Run-n50-p0.1-thin-0.05.json.gz"));
    /// ```
    #[must_use]
    pub fn run_path(&self, metadata: &RunMetadata) -> PathBuf {
        self.run_dir(metadata).join(format!(
            "Run-n{}-p{}{}.{ARCHIVE_EXTENSION}",
            metadata.n,
            format_float(metadata.p),
            Self::suffix(metadata),
        ))
    }

    /// Returns the path of the raw snapshot taken at control value `nc`.
    #[must_use]
    pub fn raw_path(&self, metadata: &RunMetadata, nc: f64) -> PathBuf {
        self.run_dir(metadata).join("raw").join(format!(
            "Raw-n{}-p{}-nc{}{}.{ARCHIVE_EXTENSION}",
            metadata.n,
            format_float(metadata.p),
            format_float(nc),
            Self::suffix(metadata),
        ))
    }
}

/// Writes `archive` to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns [`ArchiveError`] when the file cannot be created or encoded.
#[instrument(name = "archive.write", err, skip(archive), fields(path = %path.display()))]
pub fn write_archive(path: &Path, archive: &Archive) -> Result<(), ArchiveError> {
    let io_error = |source: io::Error| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, archive).map_err(|source| ArchiveError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;
    encoder.finish().map_err(io_error)?.flush().map_err(io_error)
}

/// Reads a bundle written by [`write_archive`].
///
/// # Errors
/// Returns [`ArchiveError`] when the file cannot be opened or decoded.
pub fn read_archive(path: &Path) -> Result<Archive, ArchiveError> {
    let file = File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(GzDecoder::new(file))).map_err(|source| {
        ArchiveError::Encoding {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Destination for the artifacts a sweep produces.
pub trait ArchiveSink {
    /// Persists an intermediate snapshot.
    ///
    /// # Errors
    /// Returns [`ArchiveError`] when the snapshot cannot be stored.
    fn write_raw(&mut self, snapshot: &RawSnapshot) -> Result<(), ArchiveError>;

    /// Persists the final artifact.
    ///
    /// # Errors
    /// Returns [`ArchiveError`] when the artifact cannot be stored.
    fn write_run(&mut self, artifact: &RunArtifact) -> Result<(), ArchiveError>;
}

/// Writes bundles beneath an [`ArchiveLayout`].
#[derive(Clone, Debug)]
pub struct DirectorySink {
    layout: ArchiveLayout,
}

impl DirectorySink {
    /// Creates a sink rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: ArchiveLayout::new(root),
        }
    }

    /// Returns the layout used to name files.
    #[must_use]
    pub const fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }
}

impl ArchiveSink for DirectorySink {
    fn write_raw(&mut self, snapshot: &RawSnapshot) -> Result<(), ArchiveError> {
        let path = self.layout.raw_path(&snapshot.metadata, snapshot.nc);
        write_archive(&path, &Archive::Raw(snapshot.clone()))?;
        info!(step = snapshot.step, path = %path.display(), "wrote raw snapshot");
        Ok(())
    }

    fn write_run(&mut self, artifact: &RunArtifact) -> Result<(), ArchiveError> {
        let path = self.layout.run_path(&artifact.metadata);
        write_archive(&path, &Archive::Run(artifact.clone()))?;
        info!(rows = artifact.sample.len(), path = %path.display(), "wrote run artifact");
        Ok(())
    }
}
