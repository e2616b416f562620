//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use finsight_core::TransactionStore;
use tempfile::TempDir;

use crate::commands::{self, resolve_range, truncate, Workspace};

/// 40 days of categorized history for user 1
fn history_csv() -> String {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let rotation = [
        ("Starbucks", "Food & Dining", 5.25),
        ("Uber", "Transportation", 18.0),
        ("Amazon", "Shopping", 64.0),
        ("PG&E", "Utilities", 110.0),
    ];

    let mut csv = String::from("id,date,amount,merchant,category,description,user_id\n");
    for day in 0..40 {
        let (merchant, category, amount) = rotation[day as usize % rotation.len()];
        let date = start + Duration::days(day);
        csv.push_str(&format!(
            "{},{} 12:00:00,{},{},{},,1\n",
            day + 1,
            date,
            amount,
            merchant,
            category
        ));
    }
    csv
}

/// Write the history to a temp dir and open a workspace over it
fn setup_workspace(json: bool) -> (TempDir, Workspace) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("transactions.csv");
    fs::write(&file, history_csv()).unwrap();
    let ws = open(dir.path(), &file, json);
    (dir, ws)
}

/// Open with an explicit (missing) config path so no user override is read
fn open(dir: &Path, file: &Path, json: bool) -> Workspace {
    let config = dir.join("engine.toml");
    Workspace::open(file, 1, Some(config.as_path()), json).unwrap()
}

// ========== Workspace Tests ==========

#[test]
fn test_workspace_loads_csv() {
    let (_dir, ws) = setup_workspace(false);
    assert_eq!(ws.store.len(), 40);
    assert_eq!(ws.batch().unwrap().len(), 40);
}

#[test]
fn test_workspace_missing_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let ws = open(dir.path(), &dir.path().join("new.csv"), false);
    assert!(ws.store.is_empty());
}

#[test]
fn test_workspace_rejects_bad_csv() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.csv");
    fs::write(&file, "date,amount,merchant\nnot-a-date,1.00,X\n").unwrap();

    let config = dir.path().join("engine.toml");
    assert!(Workspace::open(&file, 1, Some(config.as_path()), false).is_err());
}

#[test]
fn test_workspace_uses_config_override() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("engine.toml");
    fs::write(&config, "[forecast]\nmin_transactions = 5\nmin_days = 5\n").unwrap();

    let file = dir.path().join("none.csv");
    let ws = Workspace::open(&file, 1, Some(config.as_path()), false).unwrap();
    assert_eq!(ws.engine.config().forecast.min_days, 5);
}

#[test]
fn test_workspace_range_filter() {
    let (_dir, ws) = setup_workspace(false);
    let ws = ws
        .with_range(Some("2024-05-01"), Some("2024-05-10"))
        .unwrap();
    assert_eq!(ws.batch().unwrap().len(), 10);
}

#[test]
fn test_resolve_range() {
    assert!(resolve_range(None, None).unwrap().is_none());

    let (start, end) = resolve_range(Some("2024-01-01"), None).unwrap().unwrap();
    assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(end, NaiveDate::MAX);

    assert!(resolve_range(Some("2024-02-01"), Some("2024-01-01")).is_err());
    assert!(resolve_range(Some("01/02/2024"), None).is_err());
}

// ========== Analytics Command Tests ==========

#[test]
fn test_cmd_analytics() {
    let (_dir, ws) = setup_workspace(false);
    assert!(commands::cmd_analytics(&ws).is_ok());
}

#[test]
fn test_cmd_analytics_json() {
    let (_dir, ws) = setup_workspace(true);
    assert!(commands::cmd_analytics(&ws).is_ok());
}

#[test]
fn test_cmd_analytics_empty_fails() {
    let dir = TempDir::new().unwrap();
    let ws = open(dir.path(), &dir.path().join("empty.csv"), false);
    assert!(commands::cmd_analytics(&ws).is_err());
}

#[test]
fn test_cmd_forecast() {
    let (_dir, ws) = setup_workspace(false);
    assert!(commands::cmd_forecast(&ws).is_ok());

    // Only 10 days in range: not enough history
    let ws = ws
        .with_range(Some("2024-05-01"), Some("2024-05-10"))
        .unwrap();
    assert!(commands::cmd_forecast(&ws).is_err());
}

#[test]
fn test_cmd_budget_health_performance() {
    let (_dir, ws) = setup_workspace(false);
    assert!(commands::cmd_budget(&ws).is_ok());
    assert!(commands::cmd_health(&ws).is_ok());
    assert!(commands::cmd_performance(&ws).is_ok());
}

#[test]
fn test_cmd_report_with_little_data() {
    let (_dir, ws) = setup_workspace(true);
    let ws = ws
        .with_range(Some("2024-05-01"), Some("2024-05-03"))
        .unwrap();
    assert!(commands::cmd_report(&ws).is_ok());
}

// ========== Model Command Tests ==========

#[test]
fn test_cmd_anomalies() {
    let (_dir, ws) = setup_workspace(false);
    assert!(commands::cmd_anomalies(&ws).is_ok());
}

#[test]
fn test_cmd_predict() {
    let (_dir, ws) = setup_workspace(false);
    assert!(commands::cmd_predict(&ws, 5.25, "Starbucks", "2024-06-12").is_ok());
}

#[test]
fn test_cmd_predict_bad_date() {
    let (_dir, ws) = setup_workspace(false);
    assert!(commands::cmd_predict(&ws, 5.25, "Starbucks", "06/12/2024").is_err());
}

#[test]
fn test_cmd_predict_without_history() {
    let dir = TempDir::new().unwrap();
    let ws = open(dir.path(), &dir.path().join("empty.csv"), false);
    assert!(commands::cmd_predict(&ws, 5.25, "Starbucks", "2024-06-12").is_err());
}

#[test]
fn test_cmd_add_predicts_and_saves() {
    let (dir, ws) = setup_workspace(false);
    let file = ws.file.clone();

    commands::cmd_add(&ws, 6.0, "Starbucks", "2024-06-10", "Latte", None).unwrap();

    let reopened = open(dir.path(), &file, false);
    assert_eq!(reopened.store.len(), 41);
    let newest = &reopened.store.list_transactions(1, None).unwrap()[0];
    assert_eq!(newest.id, 41);
    assert_eq!(newest.description, "Latte");
    assert!(newest.category.is_some());
}

#[test]
fn test_cmd_add_with_category() {
    let (_dir, ws) = setup_workspace(true);
    commands::cmd_add(&ws, 300.0, "Delta", "2024-06-11", "", Some("Travel")).unwrap();

    let newest = &ws.store.list_transactions(1, None).unwrap()[0];
    assert_eq!(newest.category.as_deref(), Some("Travel"));
}

#[test]
fn test_cmd_add_to_new_file_is_uncategorized() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("fresh.csv");
    let ws = open(dir.path(), &file, false);

    commands::cmd_add(&ws, 9.99, "Netflix", "2024-06-01", "", None).unwrap();
    assert!(file.exists());

    let reopened = open(dir.path(), &file, false);
    let all = reopened.store.all();
    assert_eq!(all.len(), 1);
    assert!(all[0].category.is_none());
}

#[test]
fn test_cmd_add_rejects_negative_amount() {
    let (_dir, ws) = setup_workspace(false);
    assert!(commands::cmd_add(&ws, -5.0, "Refund", "2024-06-01", "", Some("Other")).is_err());
    assert_eq!(ws.store.len(), 40);
}

// ========== Transactions Command Tests ==========

#[test]
fn test_cmd_transactions_list() {
    let (_dir, ws) = setup_workspace(false);
    assert!(commands::cmd_transactions_list(&ws, 5).is_ok());
}

#[test]
fn test_cmd_transactions_list_empty() {
    let dir = TempDir::new().unwrap();
    let ws = open(dir.path(), &dir.path().join("none.csv"), false);
    assert!(commands::cmd_transactions_list(&ws, 20).is_ok());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer merchant name", 10), "a much ...");
    assert_eq!(truncate("Café Olé", 8), "Café Olé");
}
