//! CLI module
//!
//! Command-line interface for the connector.
//!
//! # Commands
//!
//! - `subscriptions` - Pull all, active or cancelled subscriptions
//! - `orders` - Pull all orders or processed orders by id
//! - `check-config` - Validate and print the configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, SubscriptionStatus};
pub use runner::Runner;
