//! Analytics command implementations

use anyhow::{Context, Result};
use finsight_core::{InsightReport, Trend};

use super::{emit, truncate, Workspace};

pub fn cmd_analytics(ws: &Workspace) -> Result<()> {
    let batch = ws.batch()?;
    let summary = ws
        .engine
        .analytics(&batch)
        .context("Failed to compute analytics")?;

    emit(ws, &summary, |s| {
        println!();
        println!("📊 Spending Summary");
        println!("   ─────────────────────────────────────────────────────────────");
        println!("   Total spent:        ${:>10.2}", s.total_spent);
        println!("   Transactions:        {:>10}", s.total_transactions);
        println!("   Average:            ${:>10.2}", s.avg_transaction);
        println!("   Last 30 days:       ${:>10.2}", s.recent_spending);

        if !s.category_breakdown.is_empty() {
            println!();
            println!("   By category:");
            for c in &s.category_breakdown {
                println!("     {:<20} ${:>10.2}", truncate(&c.category, 20), c.amount);
            }
        }

        println!();
        println!("   By month:");
        for m in &s.monthly_spending {
            println!("     {:<20} ${:>10.2}", m.month, m.amount);
        }
    })
}

pub fn cmd_forecast(ws: &Workspace) -> Result<()> {
    let batch = ws.batch()?;
    let forecast = ws
        .engine
        .forecast(&batch)
        .context("Failed to forecast spending")?;

    emit(ws, &forecast, |f| {
        println!();
        println!("🔮 Spending Forecast");
        println!("   ─────────────────────────────────────────────────────────────");
        println!("   Next month:         ${:>10.2}", f.predicted_next_month);
        println!("   Daily average:      ${:>10.2}", f.daily_average);
        println!("   Days observed:       {:>10}", f.days_observed);
        println!("   Confidence:          {:>9.0}%", f.confidence * 100.0);
    })
}

pub fn cmd_budget(ws: &Workspace) -> Result<()> {
    let batch = ws.batch()?;
    let recommendations = ws
        .engine
        .budget_recommendations(&batch)
        .context("Failed to compute budget recommendations")?;

    emit(ws, &recommendations, |recs| {
        println!();
        println!("💡 Budget Recommendations");
        println!("   ─────────────────────────────────────────────────────────────");

        if recs.is_empty() {
            println!("   No category takes more than 20% of your spending.");
            return;
        }

        for r in recs {
            println!(
                "   {:<20} ${:>10.2} ({:>4.1}%)",
                truncate(&r.category, 20),
                r.current_spending,
                r.share * 100.0
            );
            println!(
                "     {} (save ${:.2})",
                r.recommendation, r.potential_savings
            );
        }
    })
}

pub fn cmd_health(ws: &Workspace) -> Result<()> {
    let batch = ws.batch()?;
    let health = ws
        .engine
        .health_score(&batch)
        .context("Failed to compute health score")?;

    emit(ws, &health, |h| {
        println!();
        println!("❤️  Financial Health: {}/100", h.score);
        println!("   ─────────────────────────────────────────────────────────────");
        for factor in &h.factors {
            println!("   • {}", factor);
        }
    })
}

pub fn cmd_performance(ws: &Workspace) -> Result<()> {
    let batch = ws.batch()?;
    let categories = ws
        .engine
        .category_performance(&batch)
        .context("Failed to rate categories")?;

    emit(ws, &categories, |cats| {
        println!();
        println!("🏷️  Category Performance");
        println!("   ─────────────────────────────────────────────────────────────");
        for c in cats {
            let arrow = match c.trend {
                Trend::Up => "↑",
                Trend::Down => "↓",
                Trend::Stable => "→",
            };
            println!(
                "   {:<20} {:>3} {:<9} {} ${:>9.2} │ {:>5.2}/wk",
                truncate(&c.category, 20),
                c.performance_score,
                c.rating.as_str(),
                arrow,
                c.total_spent,
                c.frequency
            );
        }
    })
}

pub fn cmd_report(ws: &Workspace) -> Result<()> {
    let batch = ws.batch()?;
    let report = ws.engine.report(&batch).context("Failed to build report")?;

    emit(ws, &report, print_report)
}

fn print_report(report: &InsightReport) {
    println!();
    println!("📋 Spending Report");
    println!("   ─────────────────────────────────────────────────────────────");

    match &report.summary {
        Some(s) => println!(
            "   Spent ${:.2} over {} transactions (avg ${:.2})",
            s.total_spent, s.total_transactions, s.avg_transaction
        ),
        None => println!("   No transactions to summarize"),
    }
    match &report.forecast {
        Some(f) => println!("   Next month forecast: ${:.2}", f.predicted_next_month),
        None => println!("   Forecast: not enough history"),
    }
    if let Some(health) = &report.health {
        println!("   Health score: {}/100", health.score);
    }
    if let Some(recs) = &report.budget {
        for r in recs {
            println!("   💡 {}", r.recommendation);
        }
    }
    if let Some(cats) = &report.categories {
        if let Some(best) = cats.first() {
            println!("   Best category: {} ({})", best.category, best.rating);
        }
        if let Some(worst) = cats.last().filter(|_| cats.len() > 1) {
            println!("   Needs attention: {} ({})", worst.category, worst.rating);
        }
    }
}
