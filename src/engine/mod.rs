//! Execution engine module
//!
//! The paginated fetch loop.
//!
//! # Overview
//!
//! A [`PageFetcher`] issues one GET at a time, decodes the record array of
//! each page, follows `next_cursor` until it runs out and paces requests with
//! the configured [`Pacer`]. Records of every page are accumulated in memory
//! and returned together; any transport, status or decode error aborts the
//! fetch without a partial result.

mod types;

pub use types::{FetchOutput, FetchStats};

use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::Result;
use crate::http::{HttpClient, Pacer, PacingPolicy};
use crate::pagination::{CursorPaginator, NextPage, PaginationState};
use crate::records::Resource;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Paginated fetcher over the Recharge list endpoints
#[derive(Debug, Clone)]
pub struct PageFetcher {
    /// HTTP client
    client: HttpClient,
    /// Pause policy between pages
    pacer: Arc<dyn Pacer>,
}

impl PageFetcher {
    /// Create a fetcher with the default pacing (500 ms between pages)
    pub fn new(client: HttpClient) -> Self {
        Self::with_pacer(client, PacingPolicy::default().build())
    }

    /// Create a fetcher with an explicit pacer
    pub fn with_pacer(client: HttpClient, pacer: Arc<dyn Pacer>) -> Self {
        Self { client, pacer }
    }

    /// Get the HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Fetch every page starting at `initial_url`
    ///
    /// Follow-up pages are requested at `{base_path}?limit=250&page_info=..`.
    pub async fn fetch_all(
        &self,
        initial_url: &str,
        resource: Resource,
        base_path: &str,
    ) -> Result<FetchOutput> {
        let start = Instant::now();
        let decoder = JsonDecoder::with_key(resource.record_key());
        let paginator = CursorPaginator::new(base_path);

        let mut state = PaginationState::new();
        let mut output = FetchOutput::default();
        let mut url = initial_url.to_string();

        debug!("Starting fetch of {resource} at {initial_url}");

        loop {
            self.pacer.before_page(output.stats.pages).await;

            let body = self.client.get_json(&url).await?;
            let records = decoder.decode(&body)?;
            let record_count = records.len();

            output.stats.add_page();
            output.stats.add_records(record_count);
            output.records.extend(records);

            info!(
                "Fetched {resource} page {}: {record_count} records ({} total)",
                output.stats.pages, output.stats.records
            );

            match paginator.process_response(&body, record_count, &mut state) {
                NextPage::Continue { url: next } => url = next,
                NextPage::Done => break,
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        output
            .stats
            .set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Completed fetch of {resource}: {} records in {} pages",
            output.stats.records, output.stats.pages
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests;
