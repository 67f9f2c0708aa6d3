//! Recharge connector
//!
//! The public pulls. Each one fetches every page of its endpoint and flattens
//! the accumulated records once.

use crate::config::ConnectorConfig;
use crate::endpoints::{resource_base, OrderQuery, SubscriptionQuery};
use crate::engine::{FetchOutput, PageFetcher};
use crate::error::Result;
use crate::flatten::{flatten_orders, flatten_subscriptions};
use crate::http::HttpClient;
use crate::output::Table;
use crate::records::Resource;
use crate::types::RowErrorPolicy;
use tracing::info;

/// Client for the subscription and order pulls
#[derive(Debug, Clone)]
pub struct RechargeConnector {
    config: ConnectorConfig,
    fetcher: PageFetcher,
}

impl RechargeConnector {
    /// Create a connector from a validated config
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_config(config.http_client_config()?)?;
        let fetcher = PageFetcher::with_pacer(client, config.pacing.build());
        Ok(Self { config, fetcher })
    }

    /// Get the config
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Row error policy applied by the flatteners
    pub fn row_errors(&self) -> RowErrorPolicy {
        self.config.row_errors
    }

    /// Every subscription
    pub async fn pull_all_subscriptions(&self) -> Result<Table> {
        self.pull_subscriptions(&SubscriptionQuery::All).await
    }

    /// Active subscriptions
    pub async fn pull_active_subscriptions(&self) -> Result<Table> {
        self.pull_subscriptions(&SubscriptionQuery::Active).await
    }

    /// Cancelled subscriptions, created between `start_date` and `end_date`
    ///
    /// The date window is only sent when both dates are non-empty.
    pub async fn pull_cancelled_subscriptions(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Table> {
        self.pull_subscriptions(&SubscriptionQuery::cancelled(start_date, end_date))
            .await
    }

    /// Every order, one row per line item
    pub async fn pull_all_orders(&self) -> Result<Table> {
        self.pull_orders(&OrderQuery::All).await
    }

    /// Processed orders with the given ids, one row per line item
    pub async fn pull_orders_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<Table> {
        let ids = ids.iter().map(|id| id.as_ref().to_string()).collect();
        self.pull_orders(&OrderQuery::ByIds(ids)).await
    }

    /// Run a subscription query
    pub async fn pull_subscriptions(&self, query: &SubscriptionQuery) -> Result<Table> {
        let output = self
            .fetch(Resource::Subscriptions, &query.url(&self.config.base_url))
            .await?;
        let table = flatten_subscriptions(&output.records, self.config.row_errors)?;
        log_table(Resource::Subscriptions, &output, &table);
        Ok(table)
    }

    /// Run an order query
    pub async fn pull_orders(&self, query: &OrderQuery) -> Result<Table> {
        let output = self
            .fetch(Resource::Orders, &query.url(&self.config.base_url))
            .await?;
        let table = flatten_orders(&output.records, self.config.row_errors)?;
        log_table(Resource::Orders, &output, &table);
        Ok(table)
    }

    async fn fetch(&self, resource: Resource, initial_url: &str) -> Result<FetchOutput> {
        let base_path = resource_base(&self.config.base_url, resource);
        self.fetcher
            .fetch_all(initial_url, resource, &base_path)
            .await
    }
}

fn log_table(resource: Resource, output: &FetchOutput, table: &Table) {
    let report = table.report();
    info!(
        "Pulled {resource}: {} records, {} rows, {} skipped in {}ms",
        output.stats.records,
        table.num_rows(),
        report.skipped_records(),
        output.stats.elapsed_ms
    );
}
