//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, SubscriptionStatus};
use crate::config::ConnectorConfig;
use crate::connector::RechargeConnector;
use crate::endpoints::{OrderQuery, SubscriptionQuery};
use crate::error::{Error, Result};
use crate::output::{write_table_to_parquet, ParquetWriterConfig, Table};
use crate::types::RowErrorPolicy;
use serde_json::{json, Value};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        self.check_output()?;

        match &self.cli.command {
            Commands::Subscriptions {
                status,
                start_date,
                end_date,
            } => {
                let query = subscription_query(*status, start_date.as_deref(), end_date.as_deref());
                let connector = self.connector()?;
                let table = connector.pull_subscriptions(&query).await?;
                self.emit(&table)
            }
            Commands::Orders { ids } => {
                let query = if ids.is_empty() {
                    OrderQuery::All
                } else {
                    OrderQuery::ByIds(ids.clone())
                };
                let connector = self.connector()?;
                let table = connector.pull_orders(&query).await?;
                self.emit(&table)
            }
            Commands::CheckConfig => self.check_config(),
        }
    }

    /// Reject output flags that cannot be honored, before anything is fetched
    fn check_output(&self) -> Result<()> {
        let pulls = !matches!(self.cli.command, Commands::CheckConfig);
        if pulls && self.cli.format == OutputFormat::Parquet && self.cli.output.is_none() {
            return Err(Error::config("Parquet format requires --output"));
        }
        Ok(())
    }

    /// Load, override and validate the config
    fn load_config(&self) -> Result<ConnectorConfig> {
        let mut config = ConnectorConfig::load(self.cli.config.as_deref())?;
        if self.cli.strict {
            config.row_errors = RowErrorPolicy::Fail;
        }
        Ok(config)
    }

    fn connector(&self) -> Result<RechargeConnector> {
        RechargeConnector::new(self.load_config()?)
    }

    fn check_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let shown = serde_json::to_value(config.redacted())?;
        self.output_message(&json!({
            "type": "CONFIG",
            "config": shown
        }));
        Ok(())
    }

    /// Write the table to Parquet and/or stdout; the report goes to the log
    fn emit(&self, table: &Table) -> Result<()> {
        if let Some(path) = &self.cli.output {
            let rows = write_table_to_parquet(path, table, Some(&ParquetWriterConfig::default()))?;
            info!("Wrote {rows} rows to {}", path.display());
        }

        if self.cli.format != OutputFormat::Parquet {
            for row in table.to_json_rows()? {
                self.output_message(&row);
            }
        }

        let report = table.report();
        if report.is_clean() {
            info!(
                "{} records in, {} rows out, {} values cast",
                report.records_in, report.rows_out, report.cast_values
            );
        } else {
            warn!(
                "{} records in, {} rows out, {} skipped, {} values coerced, unrecognized fields {:?}",
                report.records_in,
                report.rows_out,
                report.skipped_records(),
                report.coerced_values,
                report.unrecognized_fields
            );
        }
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json | OutputFormat::Parquet => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn subscription_query(
    status: SubscriptionStatus,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> SubscriptionQuery {
    match status {
        SubscriptionStatus::All => SubscriptionQuery::All,
        SubscriptionStatus::Active => SubscriptionQuery::Active,
        SubscriptionStatus::Cancelled => {
            SubscriptionQuery::cancelled(start_date.unwrap_or_default(), end_date.unwrap_or_default())
        }
    }
}
