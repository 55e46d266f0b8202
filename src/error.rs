use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::{io, path::PathBuf};
use zip::result::ZipError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported file extension '{tag}': only .zip archives are supported")]
    UnsupportedFormat { tag: String },

    #[error("'{}' is not a {expected} file", .path.display())]
    InvalidInput {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("failed to read archive '{}': {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("archive entry '{entry}' resolves outside the working directory")]
    UnsafeEntry { entry: String },

    #[error("archive entry '{entry}' needs '{file}' to be a directory, but it is a file")]
    ConflictingEntry { entry: String, file: String },

    #[error("i/o error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no CSV file found in '{}'", .dir.display())]
    NoTableFound { dir: PathBuf },

    #[error("more than one CSV file found, refusing to pick one: {}", .candidates.join(", "))]
    AmbiguousTable { candidates: Vec<String> },

    #[error("failed to parse CSV '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ArrowError,
    },

    #[error("CSV '{}' has no header row", .path.display())]
    EmptyTable { path: PathBuf },

    #[error("failed to write parquet '{}': {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: ParquetError,
    },
}

/// Coarse classification of [`Error`], for callers that only care which
/// stage of ingestion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedFormat,
    InvalidInput,
    ArchiveError,
    UnsafeEntry,
    Io,
    NoTableFound,
    AmbiguousTable,
    ParseError,
    ExportError,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::Archive { .. } | Error::ConflictingEntry { .. } => ErrorKind::ArchiveError,
            Error::UnsafeEntry { .. } => ErrorKind::UnsafeEntry,
            Error::Io { .. } => ErrorKind::Io,
            Error::NoTableFound { .. } => ErrorKind::NoTableFound,
            Error::AmbiguousTable { .. } => ErrorKind::AmbiguousTable,
            Error::Parse { .. } | Error::EmptyTable { .. } => ErrorKind::ParseError,
            Error::Export { .. } => ErrorKind::ExportError,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, source: ZipError) -> Self {
        Error::Archive {
            path: path.into(),
            source,
        }
    }
}
