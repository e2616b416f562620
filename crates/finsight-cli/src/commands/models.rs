//! Model command implementations: prediction, anomalies, recording

use anyhow::{Context, Result};
use finsight_core::import::parse_timestamp;
use finsight_core::{Error, NewTransaction, Transaction};
use serde::Serialize;
use tracing::warn;

use super::{emit, truncate, Workspace};

#[derive(Serialize)]
struct Prediction<'a> {
    merchant: &'a str,
    amount: f64,
    date: &'a str,
    category: String,
}

/// Train the category model on the user's labeled history
///
/// Returns false (after logging) when there is not enough labeled data.
fn train_on_history(ws: &Workspace, batch: &[Transaction]) -> Result<bool> {
    match ws.engine.train_classifier(batch) {
        Ok(_) => Ok(true),
        Err(e @ Error::InsufficientData { .. }) => {
            warn!(error = %e, "Category model not trained");
            Ok(false)
        }
        Err(e) => Err(e).context("Failed to train category model"),
    }
}

pub fn cmd_predict(ws: &Workspace, amount: f64, merchant: &str, date: &str) -> Result<()> {
    let batch = ws.batch()?;
    if !train_on_history(ws, &batch)? {
        anyhow::bail!(
            "Need at least {} categorized transactions to predict categories",
            ws.engine.config().classifier.min_training_samples
        );
    }

    let category = ws
        .engine
        .predict_category(amount, merchant, date)
        .context("Failed to predict category")?;

    let prediction = Prediction {
        merchant,
        amount,
        date,
        category,
    };
    emit(ws, &prediction, |p| {
        println!(
            "🏷️  {} ${:.2} on {} → {}",
            p.merchant, p.amount, p.date, p.category
        );
    })
}

pub fn cmd_anomalies(ws: &Workspace) -> Result<()> {
    let batch = ws.batch()?;
    let flagged = ws
        .engine
        .detect_anomalies(&batch)
        .context("Failed to detect anomalies")?;

    emit(ws, &flagged, |flagged| {
        println!();
        println!("🚨 Unusual Transactions");
        println!("   ─────────────────────────────────────────────────────────────");

        if flagged.is_empty() {
            println!("   Nothing unusual found.");
            return;
        }

        for f in flagged {
            let tx = &f.transaction;
            println!(
                "   [{}] {} │ ${:>9.2} │ {:<25} │ score {:.3}",
                tx.id,
                tx.day(),
                tx.amount,
                truncate(&tx.merchant, 25),
                f.score
            );
        }
    })
}

pub fn cmd_add(
    ws: &Workspace,
    amount: f64,
    merchant: &str,
    date: &str,
    description: &str,
    category: Option<&str>,
) -> Result<()> {
    let date = parse_timestamp(date).context("Invalid --date (use YYYY-MM-DD)")?;

    if category.is_none() {
        let batch = ws.batch()?;
        train_on_history(ws, &batch)?;
    }

    let stored = ws
        .engine
        .record_transaction(
            &ws.store,
            NewTransaction {
                amount,
                merchant: merchant.to_string(),
                category: category.map(str::to_string),
                date,
                description: description.to_string(),
                user_id: ws.user_id,
            },
        )
        .context("Failed to record transaction")?;

    ws.save()?;

    emit(ws, &stored, |tx| {
        println!(
            "✅ Recorded #{}: {} ${:.2} on {}",
            tx.id,
            tx.merchant,
            tx.amount,
            tx.day()
        );
        match &tx.category {
            Some(category) => println!("   Category: {}", category),
            None => println!("   Category: (uncategorized)"),
        }
    })
}
