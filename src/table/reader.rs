use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::{
    fs::File,
    io::{BufReader, Seek},
    path::Path,
    sync::Arc,
};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    table::Table,
};

/// Delimited-text parsing knobs. The first row is always the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote: u8,
    /// Records scanned for type inference; `None` scans the whole file.
    pub infer_rows: Option<usize>,
    pub batch_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            infer_rows: None,
            batch_size: 8192,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_infer_rows(mut self, infer_rows: Option<usize>) -> Self {
        self.infer_rows = infer_rows;
        self
    }

    fn format(&self) -> Format {
        Format::default()
            .with_header(true)
            .with_delimiter(self.delimiter)
            .with_quote(self.quote)
    }
}

/// Columns with no non-empty cell infer as `Null`; read them as text
/// instead, so every column holds a concrete type.
fn null_columns_as_text(schema: Schema) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| match f.data_type() {
            DataType::Null => f.as_ref().clone().with_data_type(DataType::Utf8),
            _ => f.as_ref().clone(),
        })
        .collect();
    Schema::new_with_metadata(fields, schema.metadata().clone())
}

/// Parse `path` into a [`Table`], inferring column types from the header
/// and cell contents. Columns that are empty in every row are `Utf8`,
/// all null.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_csv(path: &Path, options: &CsvOptions) -> Result<Table> {
    let parse_err = |source: ArrowError| Error::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;

    let (schema, scanned) = options
        .format()
        .infer_schema(&mut file, options.infer_rows)
        .map_err(parse_err)?;
    if schema.fields().is_empty() {
        return Err(Error::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    debug!(
        columns = schema.fields().len(),
        scanned, "inferred CSV schema"
    );

    file.rewind().map_err(|e| Error::io(path, e))?;

    let schema = Arc::new(null_columns_as_text(schema));
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(options.delimiter)
        .with_quote(options.quote)
        .with_batch_size(options.batch_size)
        .build(BufReader::new(file))
        .map_err(parse_err)?;

    let batches = reader
        .collect::<std::result::Result<Vec<RecordBatch>, ArrowError>>()
        .map_err(parse_err)?;
    let batch = concat_batches(&schema, &batches).map_err(parse_err)?;

    Ok(Table::new(batch))
}
