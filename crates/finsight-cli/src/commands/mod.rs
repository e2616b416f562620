//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared workspace loading (CSV → store → engine) and output helpers
//! - `analytics` - Summary, forecast, budget, health, performance and report
//! - `models` - Category prediction, anomaly detection, recording transactions
//! - `transactions` - Transaction listing

pub mod analytics;
pub mod core;
pub mod models;
pub mod transactions;

// Re-export command functions for main.rs
pub use analytics::*;
pub use core::*;
pub use models::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
