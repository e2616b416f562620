//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finsight - Understand where your money goes
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Transaction analytics, forecasting and anomaly detection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transaction CSV (id,date,amount,merchant,category,description,user_id)
    #[arg(short, long, default_value = "transactions.csv", global = true)]
    pub file: PathBuf,

    /// User whose transactions are analyzed
    #[arg(short, long, default_value_t = 1, global = true)]
    pub user: i64,

    /// Engine config override (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only include transactions on or after this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub from: Option<String>,

    /// Only include transactions on or before this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub to: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Totals, averages and category/month breakdowns
    Analytics,

    /// Project next month's spending
    Forecast,

    /// Suggest cuts for categories taking over 20% of spend
    Budget,

    /// Composite financial health score
    Health,

    /// Per-category score, rating and trend
    Performance,

    /// Run every analysis at once
    Report,

    /// Flag unusual transactions
    Anomalies,

    /// Predict the category of a transaction
    Predict {
        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Merchant name
        #[arg(short, long)]
        merchant: String,

        /// Transaction date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },

    /// Record a transaction, predicting its category if none is given
    Add {
        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Merchant name
        #[arg(short, long)]
        merchant: String,

        /// Transaction date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
        #[arg(short, long)]
        date: String,

        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,

        /// Category (skips prediction)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List recent transactions
    Transactions {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}
