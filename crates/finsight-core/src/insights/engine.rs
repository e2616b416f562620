//! Insight Engine - shared analysis context and the analyzer trait

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::models::{validate_batch, Transaction};

use super::types::{
    BudgetRecommendation, CategoryPerformance, HealthScore, InsightType, SpendForecast,
    SpendingSummary,
};
use super::{
    BudgetAdvisorInsight, CategoryPerformanceInsight, HealthScoreInsight, SpendForecastInsight,
    SpendingSummaryInsight,
};

/// Context provided to insight analyzers
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    /// Batch under analysis (any order)
    pub transactions: &'a [Transaction],
    /// Reference moment for trailing windows
    pub now: NaiveDateTime,
}

impl<'a> AnalysisContext<'a> {
    /// Create a new analysis context; rejects batches with invalid amounts
    pub fn new(transactions: &'a [Transaction], now: NaiveDateTime) -> Result<Self> {
        validate_batch(transactions)?;
        Ok(Self { transactions, now })
    }

    /// Create context anchored at the local clock
    pub fn current(transactions: &'a [Transaction]) -> Result<Self> {
        Self::new(transactions, chrono::Local::now().naive_local())
    }

    /// Fail with `EmptyBatch` when there is nothing to analyze
    pub fn require_transactions(&self, operation: &'static str) -> Result<&'a [Transaction]> {
        if self.transactions.is_empty() {
            return Err(Error::EmptyBatch(operation));
        }
        Ok(self.transactions)
    }
}

/// Trait for insight analyzers
pub trait Insight {
    type Output;

    /// Unique identifier for this insight type
    fn id(&self) -> InsightType;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Analyze the batch
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output>;
}

/// Output of every analyzer over one batch
///
/// An analyzer that fails (too little data, empty batch) leaves its slot empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsightReport {
    pub summary: Option<SpendingSummary>,
    pub forecast: Option<SpendForecast>,
    pub budget: Option<Vec<BudgetRecommendation>>,
    pub health: Option<HealthScore>,
    pub categories: Option<Vec<CategoryPerformance>>,
}

/// Runs all built-in analyzers over a context
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    forecast: ForecastConfig,
}

impl InsightEngine {
    pub fn new(forecast: ForecastConfig) -> Self {
        Self { forecast }
    }

    /// Run every analyzer; failures are logged and skipped
    pub fn analyze_all(&self, ctx: &AnalysisContext<'_>) -> InsightReport {
        InsightReport {
            summary: run(&SpendingSummaryInsight, ctx),
            forecast: run(&SpendForecastInsight::new(self.forecast.clone()), ctx),
            budget: run(&BudgetAdvisorInsight, ctx),
            health: run(&HealthScoreInsight, ctx),
            categories: run(&CategoryPerformanceInsight, ctx),
        }
    }

    /// Get list of built-in insight types
    pub fn insight_types(&self) -> Vec<InsightType> {
        vec![
            SpendingSummaryInsight.id(),
            SpendForecastInsight::default().id(),
            BudgetAdvisorInsight.id(),
            HealthScoreInsight.id(),
            CategoryPerformanceInsight.id(),
        ]
    }
}

fn run<I: Insight>(insight: &I, ctx: &AnalysisContext<'_>) -> Option<I::Output> {
    match insight.analyze(ctx) {
        Ok(output) => {
            tracing::debug!(insight = insight.id().as_str(), "Insight analysis complete");
            Some(output)
        }
        Err(e) => {
            tracing::warn!(
                insight = insight.id().as_str(),
                name = insight.name(),
                error = %e,
                "Insight analysis failed"
            );
            None
        }
    }
}
