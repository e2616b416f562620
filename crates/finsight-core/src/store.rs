//! Transaction storage
//!
//! The engine never owns persistence. Callers hand it batches pulled from a
//! [`TransactionStore`]; [`MemoryStore`] is the in-process implementation used
//! by the CLI and tests.

use std::sync::RwLock;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::models::{validate_amount, NewTransaction, Transaction};

/// Inclusive calendar-date range
pub type DateRange = (NaiveDate, NaiveDate);

/// Trait for transaction storage backends
pub trait TransactionStore: Send + Sync {
    /// Transactions for a user, newest first, optionally limited to a date range
    fn list_transactions(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> Result<Vec<Transaction>>;

    /// Record a transaction and return it with its assigned id
    fn append(&self, tx: NewTransaction) -> Result<Transaction>;
}

/// In-memory transaction store
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with an existing batch (ids are kept as-is)
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: RwLock::new(transactions),
        }
    }

    /// Every stored transaction, in insertion order
    pub fn all(&self) -> Vec<Transaction> {
        self.transactions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.transactions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for MemoryStore {
    fn list_transactions(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> Result<Vec<Transaction>> {
        let guard = self.transactions.read().unwrap_or_else(|e| e.into_inner());
        let mut transactions: Vec<Transaction> = guard
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .filter(|tx| match range {
                Some((start, end)) => (start..=end).contains(&tx.day()),
                None => true,
            })
            .cloned()
            .collect();

        // Stable sort keeps insertion order for identical timestamps
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    fn append(&self, tx: NewTransaction) -> Result<Transaction> {
        validate_amount(0, tx.amount)?;

        let mut guard = self.transactions.write().unwrap_or_else(|e| e.into_inner());
        let id = guard.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let stored = tx.with_id(id);
        guard.push(stored.clone());

        debug!(id, user_id = stored.user_id, "Transaction recorded");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::NaiveDateTime;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn new_tx(user_id: i64, amount: f64, day: u32) -> NewTransaction {
        NewTransaction {
            amount,
            merchant: "Costco".to_string(),
            category: Some("Shopping".to_string()),
            date: at(day),
            description: String::new(),
            user_id,
        }
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.append(new_tx(1, 10.0, 1)).unwrap();
        let b = store.append(new_tx(1, 20.0, 2)).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_append_continues_after_seeded_ids() {
        let seeded = new_tx(1, 5.0, 3).with_id(41);
        let store = MemoryStore::with_transactions(vec![seeded]);
        assert_eq!(store.append(new_tx(1, 6.0, 4)).unwrap().id, 42);
    }

    #[test]
    fn test_append_rejects_invalid_amount() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.append(new_tx(1, f64::INFINITY, 1)),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_is_newest_first_and_per_user() {
        let store = MemoryStore::new();
        store.append(new_tx(1, 10.0, 5)).unwrap();
        store.append(new_tx(2, 99.0, 6)).unwrap();
        store.append(new_tx(1, 30.0, 20)).unwrap();
        store.append(new_tx(1, 20.0, 12)).unwrap();

        let listed = store.list_transactions(1, None).unwrap();
        let amounts: Vec<f64> = listed.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, [30.0, 20.0, 10.0]);
    }

    #[test]
    fn test_list_range_is_inclusive() {
        let store = MemoryStore::new();
        for day in [1, 10, 11, 20, 21] {
            store.append(new_tx(1, day as f64, day)).unwrap();
        }

        let range = (
            NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
        );
        let listed = store.list_transactions(1, Some(range)).unwrap();
        let days: Vec<f64> = listed.iter().map(|t| t.amount).collect();
        assert_eq!(days, [20.0, 11.0, 10.0]);
    }
}
