//! Shared workspace loading and output helpers
//!
//! This module contains:
//! - `Workspace` - the CSV-backed store, the engine and the selected user
//! - `emit` - print a result as JSON or as text

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use finsight_core::models::parse_iso_date;
use finsight_core::{
    parse_csv, write_csv, AnalyticsEngine, DateRange, EngineConfig, MemoryStore, Transaction,
    TransactionStore,
};
use serde::Serialize;
use tracing::{debug, info};

/// Everything a command needs: the loaded store, a configured engine and filters
pub struct Workspace {
    pub file: PathBuf,
    pub store: MemoryStore,
    pub engine: AnalyticsEngine,
    pub user_id: i64,
    pub range: Option<DateRange>,
    pub json: bool,
}

impl Workspace {
    /// Load the CSV (a missing file starts an empty store) and configure the engine
    pub fn open(file: &Path, user_id: i64, config: Option<&Path>, json: bool) -> Result<Self> {
        let config = match config {
            Some(path) => EngineConfig::load_from(path),
            None => EngineConfig::load(),
        }
        .context("Failed to load engine config")?;

        let store = if file.exists() {
            let reader = File::open(file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let transactions = parse_csv(reader)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            info!(count = transactions.len(), file = %file.display(), "Loaded transactions");
            MemoryStore::with_transactions(transactions)
        } else {
            debug!(file = %file.display(), "No transaction file yet, starting empty");
            MemoryStore::new()
        };

        Ok(Self {
            file: file.to_path_buf(),
            store,
            engine: AnalyticsEngine::new(config),
            user_id,
            range: None,
            json,
        })
    }

    /// Restrict analysis to an inclusive date range
    pub fn with_range(mut self, from: Option<&str>, to: Option<&str>) -> Result<Self> {
        self.range = resolve_range(from, to)?;
        Ok(self)
    }

    /// The selected user's transactions, newest first
    pub fn batch(&self) -> Result<Vec<Transaction>> {
        self.store
            .list_transactions(self.user_id, self.range)
            .context("Failed to list transactions")
    }

    /// Write every stored transaction back to the CSV file
    pub fn save(&self) -> Result<()> {
        let file = File::create(&self.file)
            .with_context(|| format!("Failed to write {}", self.file.display()))?;
        write_csv(BufWriter::new(file), &self.store.all()).context("Failed to write CSV")?;
        debug!(file = %self.file.display(), count = self.store.len(), "Saved transactions");
        Ok(())
    }
}

/// Resolve optional `--from`/`--to` bounds to a date range
pub fn resolve_range(from: Option<&str>, to: Option<&str>) -> Result<Option<DateRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let start = match from {
        Some(s) => parse_iso_date(s).context("Invalid --from date format (use YYYY-MM-DD)")?,
        None => chrono::NaiveDate::MIN,
    };
    let end = match to {
        Some(s) => parse_iso_date(s).context("Invalid --to date format (use YYYY-MM-DD)")?,
        None => chrono::NaiveDate::MAX,
    };
    if start > end {
        anyhow::bail!("--from {} is after --to {}", start, end);
    }
    Ok(Some((start, end)))
}

/// Print `value` as pretty JSON, or hand it to `text` for human output
pub fn emit<T: Serialize>(ws: &Workspace, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if ws.json {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        text(value);
    }
    Ok(())
}
