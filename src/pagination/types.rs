//! Pagination types
//!
//! Defines the next-page result, the per-fetch pagination state and the
//! cursor URL builder shared by every endpoint.

use serde_json::Value;

/// Page size sent with every request
pub const PAGE_SIZE: u32 = 250;

/// Response field carrying the cursor
pub const CURSOR_FIELD: &str = "next_cursor";

/// Query parameter the cursor is echoed back in
pub const CURSOR_PARAM: &str = "page_info";

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available at this URL
    Continue {
        /// URL of the next page
        url: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with a new URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::Continue { url: url.into() }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state during one fetch
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages processed so far
    pub pages: u32,
    /// Last cursor seen
    pub cursor: Option<String>,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Count a processed page
    pub fn next_page(&mut self) {
        self.pages += 1;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Read the cursor out of a decoded response
///
/// Absent and null both mean "no cursor". Non-string cursors are rendered
/// with their JSON text; the value is otherwise passed through untouched.
pub fn extract_cursor(response: &Value) -> Option<String> {
    match response.get(CURSOR_FIELD)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Build the URL of the next page
///
/// Returns `None` when the response carries no cursor, otherwise
/// `{base_path}?limit=250&page_info={cursor}`.
pub fn next_url(response: &Value, base_path: &str) -> Option<String> {
    let cursor = extract_cursor(response)?;
    Some(format!(
        "{base_path}?limit={PAGE_SIZE}&{CURSOR_PARAM}={cursor}"
    ))
}
