//! Health Score Insight

use std::collections::HashSet;

use crate::error::Result;

use super::engine::{AnalysisContext, Insight};
use super::types::{HealthScore, InsightType};

const BASE_SCORE: i32 = 100;
const HIGH_AVERAGE: f64 = 100.0;
const HIGH_AVERAGE_PENALTY: i32 = 20;
const HIGH_VOLUME: usize = 500;
const HIGH_VOLUME_PENALTY: i32 = 15;
const DIVERSE_CATEGORIES: usize = 5;
const DIVERSITY_BONUS: i32 = 10;

/// Insight that scores overall financial health from 0 to 100
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthScoreInsight;

impl Insight for HealthScoreInsight {
    type Output = HealthScore;

    fn id(&self) -> InsightType {
        InsightType::HealthScore
    }

    fn name(&self) -> &'static str {
        "Financial Health"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<HealthScore> {
        let transactions = ctx.require_transactions("health score")?;

        let count = transactions.len();
        let average = transactions.iter().map(|tx| tx.amount).sum::<f64>() / count as f64;
        let categories = transactions
            .iter()
            .filter_map(|tx| tx.category.as_deref())
            .collect::<HashSet<_>>()
            .len();

        let mut score = BASE_SCORE;
        if average > HIGH_AVERAGE {
            score -= HIGH_AVERAGE_PENALTY;
        }
        if count > HIGH_VOLUME {
            score -= HIGH_VOLUME_PENALTY;
        }
        if categories > DIVERSE_CATEGORIES {
            score += DIVERSITY_BONUS;
        }

        Ok(HealthScore {
            score: score.clamp(0, 100),
            factors: vec![
                format!("Average transaction: ${:.2}", average),
                format!("Total transactions: {}", count),
                format!("Spending categories: {}", categories),
            ],
        })
    }
}
