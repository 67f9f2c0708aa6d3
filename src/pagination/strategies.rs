//! Cursor pagination
//!
//! Recharge paginates with an opaque `next_cursor` in the response body that
//! is echoed back as `page_info` on the resource's base path.

use super::types::{extract_cursor, next_url, NextPage, PaginationState};
use serde_json::Value;

/// Cursor-based pagination over one resource path
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Base path the next-page URL is built on
    base_path: String,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Process a response and determine if there's a next page
    pub fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.next_page();
        state.add_fetched(records_count as u64);

        // An empty cursor ends pagination just like a missing one
        let Some(cursor) = extract_cursor(body).filter(|c| !c.is_empty()) else {
            state.mark_done();
            return NextPage::Done;
        };

        let Some(url) = next_url(body, &self.base_path) else {
            state.mark_done();
            return NextPage::Done;
        };

        state.set_cursor(cursor);
        NextPage::with_url(url)
    }
}
