// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! oplog - operation logging demos
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{find_prime, nth_prime};
use oplog_core::{FanoutSink, MemorySink, Oplog, OplogConfig, Terminal, TracingSink};
use output::OutputFormat;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "oplog",
    version,
    about = "Structured operation logging with progress bars and spinners"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never draw progress bars or spinners
    #[arg(long, global = true)]
    no_render: bool,

    /// How finished operation records are printed
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Artificial delay per step, in milliseconds
    #[arg(long, global = true, default_value_t = 0)]
    pace_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the n-th prime with nested progress bars and spinners
    FindPrime(find_prime::FindPrimeArgs),
    /// Find the n-th prime inside a single async operation
    NthPrime(nth_prime::NthPrimeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("OPLOG_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => OplogConfig::load(path)?,
        None => OplogConfig::default(),
    };
    if cli.no_render {
        config.render = false;
    }

    let records = MemorySink::new();
    let oplog = Oplog::builder()
        .sink(
            FanoutSink::new()
                .with(TracingSink::new(config.logger.clone()))
                .with(records.clone()),
        )
        .terminal(Terminal::stderr())
        .config(config)
        .build();
    let pace = Duration::from_millis(cli.pace_ms);

    let (command, outcome) = match cli.command {
        Commands::FindPrime(args) => {
            let outcome = find_prime::find_prime(&oplog, &args, pace);
            ("find-prime", outcome.map(|prime| (args.n, prime)))
        }
        Commands::NthPrime(args) => {
            let outcome = nth_prime::nth_prime(&oplog, &args, pace).await;
            ("nth-prime", outcome.map(|prime| (args.n, prime)))
        }
    };
    tracing::debug!(command, records = records.len(), "command finished");

    output::print_list(&records.finished(), cli.format);
    let (n, prime) = outcome?;
    if matches!(cli.format, OutputFormat::Text) {
        match prime {
            Some(prime) => println!("Prime #{n} found: {prime}"),
            None => println!("Prime #{n} not found"),
        }
    }

    Ok(())
}
