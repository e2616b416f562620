//! Spend Forecast Insight
//!
//! Projects next month's spend as the mean of the most recent daily totals
//! times 30. The reported confidence is a configured constant.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::ForecastConfig;
use crate::error::{Error, Result};

use super::engine::{AnalysisContext, Insight};
use super::types::{InsightType, SpendForecast};

const DAYS_PER_MONTH: f64 = 30.0;

/// Insight that forecasts next month's spend
#[derive(Debug, Clone, Default)]
pub struct SpendForecastInsight {
    config: ForecastConfig,
}

impl SpendForecastInsight {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }
}

impl Insight for SpendForecastInsight {
    type Output = SpendForecast;

    fn id(&self) -> InsightType {
        InsightType::SpendForecast
    }

    fn name(&self) -> &'static str {
        "Spend Forecast"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<SpendForecast> {
        let transactions = ctx.transactions;
        if transactions.len() < self.config.min_transactions {
            return Err(Error::insufficient(
                "forecast",
                "transactions",
                self.config.min_transactions,
                transactions.len(),
            ));
        }

        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for tx in transactions {
            *daily.entry(tx.day()).or_default() += tx.amount;
        }

        if daily.len() < self.config.min_days {
            return Err(Error::insufficient(
                "forecast",
                "distinct days",
                self.config.min_days,
                daily.len(),
            ));
        }

        let window: Vec<f64> = daily
            .values()
            .rev()
            .take(self.config.window_days)
            .copied()
            .collect();
        if window.is_empty() {
            return Err(Error::insufficient("forecast", "distinct days", 1, 0));
        }
        let daily_average = window.iter().sum::<f64>() / window.len() as f64;

        Ok(SpendForecast {
            predicted_next_month: daily_average * DAYS_PER_MONTH,
            confidence: self.config.confidence,
            daily_average,
            days_observed: daily.len(),
        })
    }
}
