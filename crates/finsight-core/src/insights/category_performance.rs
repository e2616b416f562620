//! Category Performance Insight
//!
//! Rates each category by average size, weekly frequency and the last 30 days
//! against the 30 before. Windows are anchored at the latest transaction in
//! the batch, not the clock.

use chrono::Duration;

use crate::error::Result;
use crate::models::{Category, Transaction};

use super::engine::{AnalysisContext, Insight};
use super::types::{CategoryPerformance, InsightType, Rating, Trend};

const BASE_SCORE: i32 = 50;
const WINDOW_DAYS: i64 = 30;

/// Insight that scores and rates each spending category
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryPerformanceInsight;

impl Insight for CategoryPerformanceInsight {
    type Output = Vec<CategoryPerformance>;

    fn id(&self) -> InsightType {
        InsightType::CategoryPerformance
    }

    fn name(&self) -> &'static str {
        "Category Performance"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<CategoryPerformance>> {
        let transactions = ctx.require_transactions("category performance")?;

        // require_transactions guarantees at least one element
        let (Some(earliest), Some(latest)) = (
            transactions.iter().map(|tx| tx.date).min(),
            transactions.iter().map(|tx| tx.date).max(),
        ) else {
            return Ok(Vec::new());
        };

        let weeks = ((latest - earliest).num_days() as f64 / 7.0).max(1.0);
        let recent_cutoff = latest - Duration::days(WINDOW_DAYS);
        let previous_cutoff = latest - Duration::days(2 * WINDOW_DAYS);

        let mut rated: Vec<CategoryPerformance> = group_by_category(transactions)
            .into_iter()
            .map(|(category, members)| {
                let total_spent: f64 = members.iter().map(|tx| tx.amount).sum();
                let transaction_count = members.len();
                let avg_amount = total_spent / transaction_count as f64;
                let frequency = transaction_count as f64 / weeks;

                let recent_spending: f64 = members
                    .iter()
                    .filter(|tx| tx.date >= recent_cutoff)
                    .map(|tx| tx.amount)
                    .sum();
                let previous_spending: f64 = members
                    .iter()
                    .filter(|tx| tx.date >= previous_cutoff && tx.date < recent_cutoff)
                    .map(|tx| tx.amount)
                    .sum();

                let performance_score = performance_score(
                    category,
                    avg_amount,
                    frequency,
                    recent_spending,
                    previous_spending,
                );

                CategoryPerformance {
                    category: category.to_string(),
                    total_spent,
                    avg_amount,
                    transaction_count,
                    frequency,
                    recent_spending,
                    previous_spending,
                    performance_score,
                    rating: Rating::from_score(performance_score),
                    trend: Trend::between(recent_spending, previous_spending),
                }
            })
            .collect();

        // Stable: ties keep first-seen order
        rated.sort_by(|a, b| b.performance_score.cmp(&a.performance_score));
        Ok(rated)
    }
}

/// Categorized transactions grouped by category in first-seen order
fn group_by_category(transactions: &[Transaction]) -> Vec<(&str, Vec<&Transaction>)> {
    let mut groups: Vec<(&str, Vec<&Transaction>)> = Vec::new();
    for tx in transactions {
        let Some(category) = tx.category.as_deref() else {
            continue;
        };
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, members)) => members.push(tx),
            None => groups.push((category, vec![tx])),
        }
    }
    groups
}

/// Score a category from 0 to 100
///
/// Essential categories (Healthcare, Utilities, Insurance, Education) earn
/// +10 when recent spend is within 10% of the previous window. Discretionary
/// ones (Entertainment, Shopping, Travel) earn +10 when spend decreased.
///
/// Membership is case-insensitive containment of those names in `category`.
/// It is tested against the category name, not the category's total amount:
/// a name test against an amount never matches, so neither bonus would ever
/// apply.
pub fn performance_score(
    category: &str,
    avg_amount: f64,
    frequency: f64,
    recent_spending: f64,
    previous_spending: f64,
) -> i32 {
    let mut score = BASE_SCORE;

    if avg_amount < 50.0 {
        score += 20;
    } else if avg_amount < 100.0 {
        score += 10;
    } else if avg_amount > 200.0 {
        score -= 20;
    }

    if (1.0..=3.0).contains(&frequency) {
        score += 15;
    } else if frequency > 5.0 {
        score -= 15;
    }

    let ratio = (previous_spending > 0.0).then(|| recent_spending / previous_spending);
    if let Some(ratio) = ratio {
        if ratio < 0.9 {
            score += 15;
        } else if ratio > 1.1 {
            score -= 10;
        }
    }

    if names_any(category, Category::is_essential)
        && ratio.is_some_and(|r| (0.9..=1.1).contains(&r))
    {
        score += 10;
    }

    if names_any(category, Category::is_discretionary) && recent_spending < previous_spending {
        score += 10;
    }

    score.clamp(0, 100)
}

fn names_any(category: &str, kind: fn(&Category) -> bool) -> bool {
    let lower = category.to_lowercase();
    Category::all()
        .iter()
        .filter(|c| kind(c))
        .any(|c| lower.contains(&c.as_str().to_lowercase()))
}
