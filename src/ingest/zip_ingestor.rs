use std::{path::Path, time::Instant};
use tracing::{debug, info, instrument};

use crate::{
    error::{Error, Result},
    ingest::{
        extract::{unpack_zip, Workspace},
        locate::find_single_table,
        ArchiveKind, IngestOptions, Ingestor,
    },
    table::{read_csv, Table},
};

/// Ingests a zip archive holding exactly one CSV file.
#[derive(Debug, Clone, Default)]
pub struct ZipIngestor {
    options: IngestOptions,
}

impl ZipIngestor {
    pub fn new(options: IngestOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }
}

impl Ingestor for ZipIngestor {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Zip
    }

    /// 1) check the suffix, before touching the filesystem
    /// 2) unpack into the working directory
    /// 3) locate the single CSV among its immediate children
    /// 4) parse it
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    fn ingest(&self, path: &Path) -> Result<Table> {
        if !ArchiveKind::Zip.matches_path(path) {
            return Err(Error::InvalidInput {
                path: path.to_path_buf(),
                expected: ArchiveKind::Zip.extension(),
            });
        }

        let start = Instant::now();
        let workspace = Workspace::acquire(&self.options.work_dir)?;

        let files = unpack_zip(path, workspace.path())?;
        debug!(files, dir = %workspace.path().display(), "unpacked archive");

        let csv_path = find_single_table(workspace.path())?;
        let table = read_csv(&csv_path, &self.options.csv)?;

        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            elapsed = ?start.elapsed(),
            "ingested"
        );
        Ok(table)
    }
}
