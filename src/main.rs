// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! Recharge connector CLI
//!
//! Pulls subscriptions and orders and prints them as flat tables

use anyhow::Context;
use clap::Parser;
use recharge_connector::cli::{Cli, Runner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the table
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);
    if let Err(e) = run(&runner).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(runner: &Runner) -> anyhow::Result<()> {
    runner.run().await.context("recharge-connector failed")
}
