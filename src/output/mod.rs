//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet file writing.
//!
//! # Overview
//!
//! - Building Arrow batches from coerced JSON rows
//! - Converting batches back to JSON objects
//! - The `Table` returned by every pull
//! - Writing tables to Parquet files

mod schema;
mod table;
mod writer;

pub use schema::{batch_to_json, rows_to_batch};
pub use table::Table;
pub use writer::{write_table_to_parquet, ParquetWriterConfig};
