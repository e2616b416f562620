//! Error types for Finsight

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient data for {operation}: need at least {required} {unit}, found {found}")]
    InsufficientData {
        operation: &'static str,
        unit: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Category model has not been trained")]
    ModelNotTrained,

    #[error("Invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("No transactions available for {0}")]
    EmptyBatch(&'static str),

    #[error("Invalid amount {amount} at position {index}: amounts must be finite and non-negative")]
    InvalidAmount { index: usize, amount: f64 },

    #[error("Import error: {0}")]
    Import(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for a batch that is below a component's minimum size
    pub fn insufficient(
        operation: &'static str,
        unit: &'static str,
        required: usize,
        found: usize,
    ) -> Self {
        Self::InsufficientData {
            operation,
            unit,
            required,
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
