//! Analytics engine facade
//!
//! One entry point per operation. The engine owns configuration and the
//! classifier state; every other computation is a pure function of the batch
//! passed in.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::anomaly::AnomalyDetector;
use crate::classifier::{CategoryClassifier, ClassifierHandle};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::insights::{
    AnalysisContext, BudgetAdvisorInsight, BudgetRecommendation, CategoryPerformance,
    CategoryPerformanceInsight, HealthScore, HealthScoreInsight, Insight, InsightEngine,
    InsightReport, SpendForecast, SpendForecastInsight, SpendingSummary, SpendingSummaryInsight,
};
use crate::models::{NewTransaction, Transaction};
use crate::store::TransactionStore;

/// A transaction the anomaly detector flagged, with its isolation score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Isolation score in (0, 1]; higher is more anomalous
    pub score: f64,
}

/// Transaction analytics engine
#[derive(Debug, Default)]
pub struct AnalyticsEngine {
    config: EngineConfig,
    classifier: ClassifierHandle,
    detector: AnomalyDetector,
}

impl AnalyticsEngine {
    pub fn new(config: EngineConfig) -> Self {
        let detector = AnomalyDetector::new(config.anomaly.clone());
        Self {
            config,
            classifier: ClassifierHandle::new(),
            detector,
        }
    }

    /// Create an engine from the override or embedded default config
    pub fn from_default_config() -> Result<Self> {
        Ok(Self::new(EngineConfig::load()?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========== Models ==========

    /// Fit a new category model on the labeled transactions of `batch`
    ///
    /// The previous model keeps serving predictions if training fails.
    pub fn train_classifier(&self, batch: &[Transaction]) -> Result<Arc<CategoryClassifier>> {
        self.classifier.train(batch, &self.config.classifier)
    }

    pub fn is_classifier_trained(&self) -> bool {
        self.classifier.is_trained()
    }

    /// Predict a category from raw inputs (`date` is `YYYY-MM-DD`)
    pub fn predict_category(&self, amount: f64, merchant: &str, date: &str) -> Result<String> {
        self.classifier.predict(amount, merchant, date)
    }

    /// Flag unusual transactions relative to the rest of `batch`
    pub fn detect_anomalies(&self, batch: &[Transaction]) -> Result<Vec<FlaggedTransaction>> {
        Ok(self
            .detector
            .detect_scored(batch)?
            .into_iter()
            .map(|(index, score)| FlaggedTransaction {
                transaction: batch[index].clone(),
                score,
            })
            .collect())
    }

    // ========== Analytics ==========

    pub fn analytics(&self, batch: &[Transaction]) -> Result<SpendingSummary> {
        SpendingSummaryInsight.analyze(&AnalysisContext::current(batch)?)
    }

    /// Same as [`analytics`](Self::analytics) with an explicit reference moment
    pub fn analytics_at(
        &self,
        batch: &[Transaction],
        now: NaiveDateTime,
    ) -> Result<SpendingSummary> {
        SpendingSummaryInsight.analyze(&AnalysisContext::new(batch, now)?)
    }

    pub fn forecast(&self, batch: &[Transaction]) -> Result<SpendForecast> {
        SpendForecastInsight::new(self.config.forecast.clone())
            .analyze(&AnalysisContext::current(batch)?)
    }

    pub fn budget_recommendations(
        &self,
        batch: &[Transaction],
    ) -> Result<Vec<BudgetRecommendation>> {
        BudgetAdvisorInsight.analyze(&AnalysisContext::current(batch)?)
    }

    pub fn health_score(&self, batch: &[Transaction]) -> Result<HealthScore> {
        HealthScoreInsight.analyze(&AnalysisContext::current(batch)?)
    }

    pub fn category_performance(
        &self,
        batch: &[Transaction],
    ) -> Result<Vec<CategoryPerformance>> {
        CategoryPerformanceInsight.analyze(&AnalysisContext::current(batch)?)
    }

    /// Run every analyzer; the ones without enough data are left empty
    pub fn report(&self, batch: &[Transaction]) -> Result<InsightReport> {
        let ctx = AnalysisContext::current(batch)?;
        Ok(InsightEngine::new(self.config.forecast.clone()).analyze_all(&ctx))
    }

    // ========== Recording ==========

    /// Classify (when uncategorized) and append a new transaction
    ///
    /// Without a trained model the transaction is stored uncategorized.
    pub fn record_transaction(
        &self,
        store: &dyn TransactionStore,
        mut tx: NewTransaction,
    ) -> Result<Transaction> {
        if tx.category.is_none() {
            let date = tx.date.format("%Y-%m-%d").to_string();
            match self.classifier.predict(tx.amount, &tx.merchant, &date) {
                Ok(category) => tx.category = Some(category),
                Err(Error::ModelNotTrained) => {
                    warn!(
                        merchant = %tx.merchant,
                        "No category model trained, storing uncategorized"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let stored = store.append(tx)?;
        info!(
            id = stored.id,
            category = stored.category.as_deref().unwrap_or("-"),
            "Transaction recorded"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, NaiveDate};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn labeled_batch() -> Vec<Transaction> {
        (0..24)
            .map(|i| {
                let (merchant, category, amount) = if i % 2 == 0 {
                    ("Chipotle", "Food & Dining", 12.0 + (i % 5) as f64)
                } else {
                    ("Best Buy", "Shopping", 400.0 + (i % 7) as f64 * 10.0)
                };
                Transaction {
                    id: i,
                    amount,
                    merchant: merchant.to_string(),
                    category: Some(category.to_string()),
                    date: base() + Duration::days(i),
                    description: String::new(),
                    user_id: 1,
                }
            })
            .collect()
    }

    fn new_tx(category: Option<&str>) -> NewTransaction {
        NewTransaction {
            amount: 13.0,
            merchant: "Chipotle".to_string(),
            category: category.map(str::to_string),
            date: base(),
            description: "lunch".to_string(),
            user_id: 1,
        }
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnalyticsEngine>();
    }

    #[test]
    fn test_predict_before_training() {
        let engine = AnalyticsEngine::default();
        assert!(matches!(
            engine.predict_category(10.0, "Chipotle", "2024-02-05"),
            Err(Error::ModelNotTrained)
        ));
    }

    #[test]
    fn test_predict_stays_in_label_set() {
        let engine = AnalyticsEngine::default();
        engine.train_classifier(&labeled_batch()).unwrap();

        for merchant in ["Chipotle", "Best Buy", "Unknown Merchant"] {
            let category = engine.predict_category(55.0, merchant, "2024-03-01").unwrap();
            assert!(category == "Food & Dining" || category == "Shopping");
        }
    }

    #[test]
    fn test_failed_training_keeps_previous_model() {
        let engine = AnalyticsEngine::default();
        engine.train_classifier(&labeled_batch()).unwrap();

        let too_small = &labeled_batch()[..3];
        assert!(matches!(
            engine.train_classifier(too_small),
            Err(Error::InsufficientData { .. })
        ));
        assert!(engine.is_classifier_trained());
    }

    #[test]
    fn test_record_predicts_missing_category() {
        let engine = AnalyticsEngine::default();
        engine.train_classifier(&labeled_batch()).unwrap();
        let store = MemoryStore::new();

        let stored = engine.record_transaction(&store, new_tx(None)).unwrap();
        assert_eq!(stored.id, 1);
        assert!(stored.category.is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_record_keeps_user_category() {
        let engine = AnalyticsEngine::default();
        engine.train_classifier(&labeled_batch()).unwrap();
        let store = MemoryStore::new();

        let stored = engine
            .record_transaction(&store, new_tx(Some("Travel")))
            .unwrap();
        assert_eq!(stored.category.as_deref(), Some("Travel"));
    }

    #[test]
    fn test_record_without_model_stores_uncategorized() {
        let engine = AnalyticsEngine::default();
        let store = MemoryStore::new();

        let stored = engine.record_transaction(&store, new_tx(None)).unwrap();
        assert!(stored.category.is_none());
    }

    #[test]
    fn test_detect_anomalies_returns_transactions() {
        let engine = AnalyticsEngine::default();
        let mut batch = labeled_batch();
        batch.push(Transaction {
            id: 500,
            amount: 25_000.0,
            merchant: "Jeweler".to_string(),
            category: None,
            date: base() + Duration::days(3),
            description: String::new(),
            user_id: 1,
        });

        let flagged = engine.detect_anomalies(&batch).unwrap();
        assert!(flagged.iter().any(|f| f.transaction.id == 500));
        assert!(flagged.iter().all(|f| f.score > 0.0 && f.score <= 1.0));
    }

    #[test]
    fn test_report_over_batch() {
        let engine = AnalyticsEngine::default();
        let report = engine.report(&labeled_batch()).unwrap();
        assert_eq!(report.summary.unwrap().total_transactions, 24);
        // 24 transactions is below the forecast minimum
        assert!(report.forecast.is_none());
        assert_eq!(report.categories.unwrap().len(), 2);
    }

    #[test]
    fn test_analytics_at_fixed_moment() {
        let engine = AnalyticsEngine::default();
        let batch = labeled_batch();
        let summary = engine
            .analytics_at(&batch, base() + Duration::days(400))
            .unwrap();
        assert_eq!(summary.recent_spending, 0.0);
    }
}
