//! Load the single CSV file packed inside an archive into an Arrow-backed table.
//!
//! ```no_run
//! use zipingest::{ingest_path, IngestOptions};
//!
//! let table = ingest_path("data/archive.zip", IngestOptions::default())?;
//! println!("{}", table.pretty(5)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod ingest;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{Error, ErrorKind, Result};
pub use ingest::{
    extension_of, ingest_path, ingestor_for, ArchiveKind, IngestOptions, Ingestor, WorkDir,
    ZipIngestor,
};
pub use table::{CsvOptions, Table};
