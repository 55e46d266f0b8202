use parquet::{
    arrow::ArrowWriter,
    basic::{BrotliLevel, Compression},
    errors::ParquetError,
    file::properties::WriterProperties,
};
use std::{fs, fs::File, path::Path};
use tracing::{info, instrument};

use crate::{
    error::{Error, Result},
    table::Table,
};

impl Table {
    /// Write the table to a Brotli-compressed Parquet file at `path`,
    /// returning the size of the file on disk.
    #[instrument(level = "info", skip_all, fields(path = %path.display(), rows = self.num_rows()))]
    pub fn write_parquet(&self, path: &Path) -> Result<u64> {
        let export_err = |source: ParquetError| Error::Export {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| Error::io(path, e))?;

        let props = WriterProperties::builder()
            .set_compression(Compression::BROTLI(
                BrotliLevel::try_new(5).map_err(export_err)?,
            ))
            .build();

        let mut writer =
            ArrowWriter::try_new(file, self.schema(), Some(props)).map_err(export_err)?;
        writer.write(self.batch()).map_err(export_err)?;
        writer.close().map_err(export_err)?;

        let bytes = fs::metadata(path).map_err(|e| Error::io(path, e))?.len();
        info!(bytes, "wrote parquet");
        Ok(bytes)
    }
}
