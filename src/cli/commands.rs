//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pull Recharge subscriptions and orders as flat tables
#[derive(Parser, Debug)]
#[command(name = "recharge-connector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Parquet file to write the table to
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Abort on the first record that fails to flatten
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull subscriptions
    Subscriptions {
        /// Which subscriptions to pull
        #[arg(long, value_enum, default_value = "all")]
        status: SubscriptionStatus,

        /// Earliest creation date (cancelled only, needs --end-date)
        #[arg(long)]
        start_date: Option<String>,

        /// Latest creation date (cancelled only, needs --start-date)
        #[arg(long)]
        end_date: Option<String>,
    },

    /// Pull orders, one row per line item
    Orders {
        /// Only processed orders with these ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// Validate the configuration and print it with tokens masked
    CheckConfig,
}

/// Subscription status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SubscriptionStatus {
    /// Every subscription
    All,
    /// Active subscriptions
    Active,
    /// Cancelled subscriptions
    Cancelled,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one row per line)
    Json,
    /// Human-readable output
    Pretty,
    /// Parquet file only (requires --output)
    Parquet,
}
