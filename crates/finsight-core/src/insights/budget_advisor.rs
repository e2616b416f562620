//! Budget Advisor Insight
//!
//! Flags categories taking more than a fifth of categorized spend and suggests
//! cutting them by a fifth.

use crate::error::Result;

use super::engine::{AnalysisContext, Insight};
use super::spending_summary::category_totals;
use super::types::{BudgetRecommendation, InsightType};

/// Share of total spend above which a category is flagged
const CONCENTRATION_THRESHOLD: f64 = 0.2;
/// Suggested reduction for a flagged category
const REDUCTION: f64 = 0.2;

/// Insight that recommends budget cuts
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetAdvisorInsight;

impl Insight for BudgetAdvisorInsight {
    type Output = Vec<BudgetRecommendation>;

    fn id(&self) -> InsightType {
        InsightType::BudgetAdvice
    }

    fn name(&self) -> &'static str {
        "Budget Advisor"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<BudgetRecommendation>> {
        let transactions = ctx.require_transactions("budget recommendations")?;

        let totals = category_totals(transactions);
        let total: f64 = totals.iter().map(|(_, amount)| amount).sum();

        let recommendations = totals
            .into_iter()
            .filter(|(_, amount)| *amount > total * CONCENTRATION_THRESHOLD)
            .map(|(category, amount)| BudgetRecommendation {
                recommendation: format!("Consider reducing {} spending by 20%", category),
                share: amount / total,
                current_spending: amount,
                potential_savings: amount * REDUCTION,
                category,
            })
            .collect();

        Ok(recommendations)
    }
}
