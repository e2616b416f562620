//! Finsight Core Library
//!
//! Transaction analytics for the Finsight personal finance tool:
//! - Feature derivation shared by training and inference
//! - Category classifier (random forest) behind a swappable handle
//! - Batch-relative anomaly detection (isolation forest)
//! - Spending summary, forecast, budget advice, health score and
//!   per-category performance
//! - Storage contract with an in-memory store, CSV import/export
//! - Layered TOML configuration

pub mod anomaly;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod import;
pub mod insights;
pub mod ml;
pub mod models;
pub mod store;

pub use anomaly::AnomalyDetector;
pub use classifier::{CategoryClassifier, ClassifierHandle, LabelEncoder};
pub use config::{AnomalyConfig, ClassifierConfig, EngineConfig, ForecastConfig};
pub use engine::{AnalyticsEngine, FlaggedTransaction};
pub use error::{Error, Result};
pub use features::FeatureVector;
pub use import::{parse_csv, write_csv};
pub use insights::{
    AnalysisContext, BudgetRecommendation, CategoryPerformance, CategoryTotal, HealthScore,
    Insight, InsightEngine, InsightReport, InsightType, MonthTotal, Rating, SpendForecast,
    SpendingSummary, Trend,
};
pub use models::{Category, NewTransaction, Transaction};
pub use store::{DateRange, MemoryStore, TransactionStore};
