// src/ingest/mod.rs
pub mod extract;
pub mod locate;
pub mod zip_ingestor;

use std::{fmt, path::Path, path::PathBuf, str::FromStr};

use crate::{
    error::{Error, Result},
    table::{CsvOptions, Table},
};

pub use zip_ingestor::ZipIngestor;

/// Suffix a file must carry to be picked up as the archive's table.
pub const TABLE_SUFFIX: &str = ".csv";

/// Archive types with a registered ingestion routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    Zip,
}

impl ArchiveKind {
    pub const ALL: &'static [ArchiveKind] = &[ArchiveKind::Zip];

    /// The dot-prefixed extension tag, e.g. `".zip"`.
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::Zip => ".zip",
        }
    }

    /// Look up the kind registered for `tag`. Matching ignores ASCII case.
    pub fn from_extension(tag: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.extension().eq_ignore_ascii_case(tag))
            .ok_or_else(|| Error::UnsupportedFormat {
                tag: tag.to_string(),
            })
    }

    /// Whether `path` ends in this kind's extension.
    pub fn matches_path(self, path: &Path) -> bool {
        path.to_string_lossy()
            .to_ascii_lowercase()
            .ends_with(self.extension())
    }
}

impl FromStr for ArchiveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where archive entries are unpacked before the table is located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkDir {
    /// A fresh, uniquely named directory per call, removed when the call
    /// returns. Created under `parent`, or the system temp dir.
    Temporary { parent: Option<PathBuf> },
    /// A fixed directory whose contents stay on disk after the call.
    /// Calls sharing persistent directories are serialized.
    Persistent(PathBuf),
}

impl Default for WorkDir {
    fn default() -> Self {
        WorkDir::Temporary { parent: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestOptions {
    pub work_dir: WorkDir,
    pub csv: CsvOptions,
}

impl IngestOptions {
    pub fn with_work_dir(mut self, work_dir: WorkDir) -> Self {
        self.work_dir = work_dir;
        self
    }

    pub fn with_csv(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }
}

/// Extract-then-parse routine for one archive type.
pub trait Ingestor: fmt::Debug + Send + Sync {
    fn kind(&self) -> ArchiveKind;

    fn ingest(&self, path: &Path) -> Result<Table>;
}

/// Return the ingestion routine registered for `tag` (dot-prefixed).
pub fn ingestor_for(tag: &str, options: IngestOptions) -> Result<Box<dyn Ingestor>> {
    match ArchiveKind::from_extension(tag)? {
        ArchiveKind::Zip => Ok(Box::new(ZipIngestor::new(options))),
    }
}

/// Dot-prefixed extension of `path`, or `""` when it has none.
pub fn extension_of(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Pick the routine from `path`'s extension and run it.
pub fn ingest_path(path: impl AsRef<Path>, options: IngestOptions) -> Result<Table> {
    let path = path.as_ref();
    ingestor_for(&extension_of(path), options)?.ingest(path)
}
