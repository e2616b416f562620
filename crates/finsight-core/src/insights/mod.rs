//! Insight Engine - Spending Analytics
//!
//! Each analyzer is a stateless [`Insight`] over a batch of transactions and a
//! reference moment. Analyzers never touch storage; callers hand them a slice.
//!
//! ## Core Insight Types
//!
//! - **Spending Summary** - Totals, averages, category and month breakdowns
//! - **Spend Forecast** - Next-month projection from recent daily totals
//! - **Budget Advisor** - Savings targets for over-concentrated categories
//! - **Health Score** - Composite 0-100 score with readable factors
//! - **Category Performance** - Per-category score, rating and trend
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finsight_core::insights::{AnalysisContext, InsightEngine};
//!
//! let ctx = AnalysisContext::current(&transactions)?;
//! let report = InsightEngine::default().analyze_all(&ctx);
//! ```

pub mod budget_advisor;
pub mod category_performance;
pub mod engine;
pub mod health_score;
pub mod spend_forecast;
pub mod spending_summary;
pub mod types;

pub use budget_advisor::BudgetAdvisorInsight;
pub use category_performance::{performance_score, CategoryPerformanceInsight};
pub use engine::{AnalysisContext, Insight, InsightEngine, InsightReport};
pub use health_score::HealthScoreInsight;
pub use spend_forecast::SpendForecastInsight;
pub use spending_summary::SpendingSummaryInsight;
pub use types::{
    BudgetRecommendation, CategoryPerformance, CategoryTotal, HealthScore, InsightType,
    MonthTotal, Rating, SpendForecast, SpendingSummary, Trend,
};
