// src/table/mod.rs
pub mod export;
pub mod reader;

use arrow::{
    array::ArrayRef,
    datatypes::SchemaRef,
    error::ArrowError,
    record_batch::RecordBatch,
    util::pretty::pretty_format_batches,
};

pub use reader::{read_csv, CsvOptions};

/// Rows of named, typed columns parsed from one delimited file.
///
/// Backed by a single `RecordBatch`; the caller owns it outright once
/// ingestion returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// First `n` rows (fewer if the table is shorter). Zero-copy.
    pub fn head(&self, n: usize) -> Table {
        let len = n.min(self.num_rows());
        Table::new(self.batch.slice(0, len))
    }

    /// Render the first `n` rows as an ASCII grid.
    pub fn pretty(&self, n: usize) -> Result<String, ArrowError> {
        let head = self.head(n);
        Ok(pretty_format_batches(&[head.batch])?.to_string())
    }
}

impl From<RecordBatch> for Table {
    fn from(batch: RecordBatch) -> Self {
        Table::new(batch)
    }
}
