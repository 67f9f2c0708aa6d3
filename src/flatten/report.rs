//! Per-run flatten report

use std::collections::BTreeSet;

/// A record left out of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the fetched list
    pub index: usize,
    /// Why it was skipped
    pub reason: String,
}

/// What happened while flattening one record list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenReport {
    /// Records handed to the flattener
    pub records_in: usize,
    /// Rows in the resulting table
    pub rows_out: usize,
    /// Numeric strings and integral floats cast into number columns
    pub cast_values: usize,
    /// Values whose JSON kind was changed outside the declared casts
    pub coerced_values: usize,
    /// Records skipped under `RowErrorPolicy::Skip`
    pub skipped: Vec<SkippedRecord>,
    /// Top-level keys that are neither declared columns nor dropped fields
    pub unrecognized_fields: BTreeSet<String>,
}

impl FlattenReport {
    /// Create an empty report for `records_in` records
    pub fn new(records_in: usize) -> Self {
        Self {
            records_in,
            ..Default::default()
        }
    }

    /// Number of skipped records
    pub fn skipped_records(&self) -> usize {
        self.skipped.len()
    }

    /// True when nothing was skipped, coerced or left unrecognized
    ///
    /// Declared casts do not count against a clean run.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.coerced_values == 0 && self.unrecognized_fields.is_empty()
    }

    pub(crate) fn skip(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped.push(SkippedRecord {
            index,
            reason: reason.into(),
        });
    }
}
