//! Flattened output table

use super::schema::batch_to_json;
use crate::error::Result;
use crate::flatten::FlattenReport;
use arrow::array::ArrayRef;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use serde_json::Value;

/// A flattened result set: one Arrow batch plus the report of how it was built
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
    report: FlattenReport,
}

impl Table {
    /// Wrap a batch and its report
    pub fn new(batch: RecordBatch, report: FlattenReport) -> Self {
        Self { batch, report }
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Arrow schema
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    /// The underlying batch
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// How the table was built
    pub fn report(&self) -> &FlattenReport {
        &self.report
    }

    /// Consume the table, keeping the batch
    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// Rows as JSON objects
    pub fn to_json_rows(&self) -> Result<Vec<Value>> {
        batch_to_json(&self.batch)
    }
}
