//! Engine types
//!
//! Fetch output and statistics.

use serde_json::Value;

/// Everything one paginated fetch produced
#[derive(Debug, Clone, Default)]
pub struct FetchOutput {
    /// Raw records of every page, in server order
    pub records: Vec<Value>,
    /// Fetch statistics
    pub stats: FetchStats,
}

impl FetchOutput {
    /// Number of accumulated records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records were fetched
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Statistics from a fetch operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Pages fetched
    pub pages: usize,
    /// Records accumulated
    pub records: usize,
    /// Duration in milliseconds
    pub elapsed_ms: u64,
}

impl FetchStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages += 1;
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records += count;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.elapsed_ms = ms;
    }
}
