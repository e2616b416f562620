//! Result records produced by the analyzers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::serialize_money;

/// Kinds of analysis the engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Totals, averages and breakdowns
    SpendingSummary,
    /// Next-month spend projection
    SpendForecast,
    /// Savings targets for over-concentrated categories
    BudgetAdvice,
    /// Composite 0-100 financial health score
    HealthScore,
    /// Per-category score, rating and trend
    CategoryPerformance,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::SpendingSummary => "spending_summary",
            InsightType::SpendForecast => "spend_forecast",
            InsightType::BudgetAdvice => "budget_advice",
            InsightType::HealthScore => "health_score",
            InsightType::CategoryPerformance => "category_performance",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_summary" => Ok(InsightType::SpendingSummary),
            "spend_forecast" => Ok(InsightType::SpendForecast),
            "budget_advice" => Ok(InsightType::BudgetAdvice),
            "health_score" => Ok(InsightType::HealthScore),
            "category_performance" => Ok(InsightType::CategoryPerformance),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Spend attributed to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(serialize_with = "serialize_money")]
    pub amount: f64,
}

/// Spend within one calendar month (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: String,
    #[serde(serialize_with = "serialize_money")]
    pub amount: f64,
}

/// Aggregate statistics over a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    #[serde(serialize_with = "serialize_money")]
    pub total_spent: f64,
    #[serde(serialize_with = "serialize_money")]
    pub avg_transaction: f64,
    pub total_transactions: usize,
    /// Categories in first-seen order
    pub category_breakdown: Vec<CategoryTotal>,
    /// Months in chronological order
    pub monthly_spending: Vec<MonthTotal>,
    /// Spend in the 30 days ending now
    #[serde(serialize_with = "serialize_money")]
    pub recent_spending: f64,
}

/// Next-month spend projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendForecast {
    #[serde(serialize_with = "serialize_money")]
    pub predicted_next_month: f64,
    /// Fixed reported confidence
    pub confidence: f64,
    /// Mean of the daily totals in the averaging window
    #[serde(serialize_with = "serialize_money")]
    pub daily_average: f64,
    /// Distinct days with spend in the batch
    pub days_observed: usize,
}

/// Suggested cut for an over-concentrated category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecommendation {
    pub category: String,
    #[serde(serialize_with = "serialize_money")]
    pub current_spending: f64,
    /// Share of total categorized spend, 0.0-1.0
    pub share: f64,
    pub recommendation: String,
    #[serde(serialize_with = "serialize_money")]
    pub potential_savings: f64,
}

/// Composite financial health score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    /// 0-100
    pub score: i32,
    /// Average transaction, transaction count, category count (in that order)
    pub factors: Vec<String>,
}

/// Qualitative band for a performance score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Poor,
    Inactive,
}

impl Rating {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 80 => Rating::Excellent,
            s if s >= 65 => Rating::Good,
            s if s >= 50 => Rating::Average,
            s if s >= 30 => Rating::Poor,
            _ => Rating::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::Poor => "Poor",
            Rating::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of recent spend against the previous window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn between(recent: f64, previous: f64) -> Self {
        if recent > previous {
            Trend::Up
        } else if recent < previous {
            Trend::Down
        } else {
            Trend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Performance metrics for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: String,
    #[serde(serialize_with = "serialize_money")]
    pub total_spent: f64,
    #[serde(serialize_with = "serialize_money")]
    pub avg_amount: f64,
    pub transaction_count: usize,
    /// Transactions per week across the batch span
    #[serde(serialize_with = "serialize_money")]
    pub frequency: f64,
    #[serde(serialize_with = "serialize_money")]
    pub recent_spending: f64,
    #[serde(serialize_with = "serialize_money")]
    pub previous_spending: f64,
    pub performance_score: i32,
    pub rating: Rating,
    pub trend: Trend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_type_serialization() {
        assert_eq!(InsightType::HealthScore.as_str(), "health_score");
        assert_eq!(
            InsightType::from_str("spend_forecast").unwrap(),
            InsightType::SpendForecast
        );
        assert!(InsightType::from_str("bogus").is_err());
    }

    #[test]
    fn test_rating_breakpoints() {
        assert_eq!(Rating::from_score(100), Rating::Excellent);
        assert_eq!(Rating::from_score(80), Rating::Excellent);
        assert_eq!(Rating::from_score(79), Rating::Good);
        assert_eq!(Rating::from_score(65), Rating::Good);
        assert_eq!(Rating::from_score(64), Rating::Average);
        assert_eq!(Rating::from_score(50), Rating::Average);
        assert_eq!(Rating::from_score(49), Rating::Poor);
        assert_eq!(Rating::from_score(30), Rating::Poor);
        assert_eq!(Rating::from_score(29), Rating::Inactive);
        assert_eq!(Rating::from_score(0), Rating::Inactive);
    }

    #[test]
    fn test_trend_is_strict() {
        assert_eq!(Trend::between(10.0, 5.0), Trend::Up);
        assert_eq!(Trend::between(5.0, 10.0), Trend::Down);
        assert_eq!(Trend::between(7.5, 7.5), Trend::Stable);
        assert_eq!(Trend::between(0.0, 0.0), Trend::Stable);
    }

    #[test]
    fn test_money_fields_round_when_serialized() {
        let total = CategoryTotal {
            category: "Travel".to_string(),
            amount: 1234.5678,
        };
        let json = serde_json::to_value(&total).unwrap();
        assert_eq!(json["amount"], 1234.57);
        // Internal value is untouched
        assert_eq!(total.amount, 1234.5678);
    }

    #[test]
    fn test_trend_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Trend::Up).unwrap(), "up");
        assert_eq!(serde_json::to_value(Rating::Good).unwrap(), "Good");
    }
}
