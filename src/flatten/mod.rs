//! Flattening module
//!
//! Turns fetched Recharge records into flat Arrow tables.
//!
//! # Overview
//!
//! - **Declared schemas**: each record type maps onto a fixed column list with
//!   declared types (see [`subscription_schema`] and [`order_schema`])
//! - **Projection**: nested identifiers are promoted to top-level columns
//! - **Explode**: order line items become one row each
//! - **Row errors**: records with out-of-type values are skipped and counted,
//!   or abort the run, depending on [`RowErrorPolicy`]. Missing projected
//!   fields and missing dropped columns always abort.

mod columns;
mod orders;
mod report;
mod subscriptions;

pub use columns::{
    BuiltRow, CoerceFailure, Coerced, ColumnSpec, Conversion, ColumnType, RowBuilder, RowContext, TableSchema,
};
pub use orders::{flatten_orders, order_schema, ORDER_DROPPED_COLUMNS};
pub use report::{FlattenReport, SkippedRecord};
pub use subscriptions::{flatten_subscriptions, subscription_schema, SUBSCRIPTION_DROPPED_COLUMNS};

use crate::error::{Error, Result};
use crate::output::{rows_to_batch, Table};
use crate::records::Record;
use crate::types::{JsonObject, RowErrorPolicy};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// How the top-level keys of one record type are treated
pub(crate) struct RecordLayout {
    /// Bag keys copied straight into a declared column
    pub passthrough: &'static [&'static str],
    /// Keys that are recognized and intentionally left out
    pub dropped: &'static [&'static str],
}

/// Shared driver for both flatteners
pub(crate) fn flatten_records<R, F>(
    records: &[Value],
    schema: &TableSchema,
    layout: &RecordLayout,
    policy: RowErrorPolicy,
    build: F,
) -> Result<Table>
where
    R: Record,
    F: Fn(&R, RowContext, &TableSchema) -> Result<Vec<BuiltRow>>,
{
    let record_type = R::RESOURCE.record_type();
    check_dropped_present(record_type, records, layout.dropped)?;

    let known: HashSet<&str> = layout
        .passthrough
        .iter()
        .chain(layout.dropped)
        .copied()
        .collect();

    let mut report = FlattenReport::new(records.len());
    let mut rows: Vec<JsonObject> = Vec::with_capacity(records.len());

    for (index, raw) in records.iter().enumerate() {
        let ctx = RowContext { record_type, index };
        let built = R::from_value(index, raw.clone())
            .and_then(|record| build(&record, ctx, schema).map(|rows| (record, rows)));

        match built {
            Ok((record, built_rows)) => {
                for key in record.fields().keys() {
                    if !known.contains(key.as_str()) {
                        report.unrecognized_fields.insert(key.clone());
                    }
                }
                for row in built_rows {
                    report.cast_values += row.cast;
                    report.coerced_values += row.coerced;
                    rows.push(row.values);
                }
            }
            Err(e) if e.is_row_error() && policy == RowErrorPolicy::Skip => {
                warn!("Skipping {record_type} record {index}: {e}");
                report.skip(index, e.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    if !report.unrecognized_fields.is_empty() {
        warn!(
            "Unrecognized {record_type} fields left out of the table: {:?}",
            report.unrecognized_fields
        );
    }

    report.rows_out = rows.len();
    debug!(
        "Flattened {} {record_type} records into {} rows ({} skipped, {} cast, {} coerced)",
        report.records_in,
        report.rows_out,
        report.skipped_records(),
        report.cast_values,
        report.coerced_values
    );

    let batch = rows_to_batch(&schema.to_arrow(), &rows)?;
    Ok(Table::new(batch, report))
}

/// Every dropped column must appear in at least one record of a non-empty list
fn check_dropped_present(
    record_type: &'static str,
    records: &[Value],
    dropped: &[&str],
) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    for column in dropped {
        let seen = records
            .iter()
            .any(|r| r.as_object().is_some_and(|obj| obj.contains_key(*column)));
        if !seen {
            return Err(Error::MissingColumn {
                record_type,
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}
