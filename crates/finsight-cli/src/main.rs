//! Finsight CLI - Transaction analytics
//!
//! Usage:
//!   finsight analytics --file tx.csv      Spending summary
//!   finsight forecast                     Next month projection
//!   finsight anomalies                    Flag unusual transactions
//!   finsight add --amount 4.5 --merchant Starbucks --date 2024-03-02

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Workspace;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let ws = Workspace::open(&cli.file, cli.user, cli.config.as_deref(), cli.json)?
        .with_range(cli.from.as_deref(), cli.to.as_deref())?;

    match cli.command {
        Commands::Analytics => commands::cmd_analytics(&ws),
        Commands::Forecast => commands::cmd_forecast(&ws),
        Commands::Budget => commands::cmd_budget(&ws),
        Commands::Health => commands::cmd_health(&ws),
        Commands::Performance => commands::cmd_performance(&ws),
        Commands::Report => commands::cmd_report(&ws),
        Commands::Anomalies => commands::cmd_anomalies(&ws),
        Commands::Predict {
            amount,
            merchant,
            date,
        } => commands::cmd_predict(&ws, amount, &merchant, &date),
        Commands::Add {
            amount,
            merchant,
            date,
            description,
            category,
        } => commands::cmd_add(
            &ws,
            amount,
            &merchant,
            &date,
            &description,
            category.as_deref(),
        ),
        Commands::Transactions { limit } => commands::cmd_transactions_list(&ws, limit),
    }
}
