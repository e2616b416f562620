//! Transaction command implementations

use anyhow::Result;

use super::{emit, truncate, Workspace};

pub fn cmd_transactions_list(ws: &Workspace, limit: usize) -> Result<()> {
    let mut transactions = ws.batch()?;
    transactions.truncate(limit);

    if transactions.is_empty() && !ws.json {
        println!("No transactions found. Record one with:");
        println!("  finsight add --amount 12.50 --merchant Starbucks --date 2024-01-15");
        return Ok(());
    }

    emit(ws, &transactions, |transactions| {
        println!();
        println!("📝 Recent Transactions");
        println!("   ─────────────────────────────────────────────────────────────");

        for tx in transactions {
            println!(
                "   {} │ ${:>9.2} │ {:<25} │ {}",
                tx.day(),
                tx.amount,
                truncate(&tx.merchant, 25),
                tx.category.as_deref().unwrap_or("-")
            );
        }
    })
}
