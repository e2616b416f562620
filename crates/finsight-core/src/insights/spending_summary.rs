//! Spending Summary Insight
//!
//! Totals, averages, per-category and per-month breakdowns, and spend in the
//! trailing 30 days.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::error::Result;
use crate::models::Transaction;

use super::engine::{AnalysisContext, Insight};
use super::types::{CategoryTotal, InsightType, MonthTotal, SpendingSummary};

/// Days in the trailing "recent spending" window
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Insight that aggregates a batch
#[derive(Debug, Clone, Copy, Default)]
pub struct SpendingSummaryInsight;

impl Insight for SpendingSummaryInsight {
    type Output = SpendingSummary;

    fn id(&self) -> InsightType {
        InsightType::SpendingSummary
    }

    fn name(&self) -> &'static str {
        "Spending Summary"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<SpendingSummary> {
        let transactions = ctx.require_transactions("spending summary")?;

        let total_spent: f64 = transactions.iter().map(|tx| tx.amount).sum();
        let total_transactions = transactions.len();

        let mut months: BTreeMap<String, f64> = BTreeMap::new();
        for tx in transactions {
            *months.entry(tx.date.format("%Y-%m").to_string()).or_default() += tx.amount;
        }

        let cutoff = ctx.now - Duration::days(RECENT_WINDOW_DAYS);
        let recent_spending = transactions
            .iter()
            .filter(|tx| tx.date >= cutoff)
            .map(|tx| tx.amount)
            .sum();

        Ok(SpendingSummary {
            total_spent,
            avg_transaction: total_spent / total_transactions as f64,
            total_transactions,
            category_breakdown: category_totals(transactions)
                .into_iter()
                .map(|(category, amount)| CategoryTotal { category, amount })
                .collect(),
            monthly_spending: months
                .into_iter()
                .map(|(month, amount)| MonthTotal { month, amount })
                .collect(),
            recent_spending,
        })
    }
}

/// Sum of amounts per category in first-seen order
///
/// Uncategorized transactions are left out.
pub(crate) fn category_totals(transactions: &[Transaction]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for tx in transactions {
        let Some(category) = tx.category.as_deref() else {
            continue;
        };
        match totals.iter_mut().find(|(c, _)| c == category) {
            Some((_, amount)) => *amount += tx.amount,
            None => totals.push((category.to_string(), tx.amount)),
        }
    }
    totals
}
