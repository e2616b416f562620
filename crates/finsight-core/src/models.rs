//! Domain models for Finsight

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Spend amount, always finite and non-negative
    pub amount: f64,
    pub merchant: String,
    /// None until the classifier (or the user) assigns one
    pub category: Option<String>,
    pub date: NaiveDateTime,
    pub description: String,
    pub user_id: i64,
}

impl Transaction {
    /// Calendar date of the transaction (time-of-day dropped)
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

/// A new transaction to be recorded (before the store assigns an id)
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub merchant: String,
    pub category: Option<String>,
    pub date: NaiveDateTime,
    pub description: String,
    pub user_id: i64,
}

impl NewTransaction {
    /// Attach a store-assigned id
    pub fn with_id(self, id: i64) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            merchant: self.merchant,
            category: self.category,
            date: self.date,
            description: self.description,
            user_id: self.user_id,
        }
    }
}

/// Spending categories assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Transportation,
    Shopping,
    Entertainment,
    Healthcare,
    Utilities,
    Education,
    Travel,
    Insurance,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Utilities => "Utilities",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::Insurance => "Insurance",
            Self::Other => "Other",
        }
    }

    /// Get all categories
    pub fn all() -> &'static [Category] {
        &[
            Self::FoodAndDining,
            Self::Transportation,
            Self::Shopping,
            Self::Entertainment,
            Self::Healthcare,
            Self::Utilities,
            Self::Education,
            Self::Travel,
            Self::Insurance,
            Self::Other,
        ]
    }

    /// Necessities where steady month-over-month spend is healthy
    pub fn is_essential(&self) -> bool {
        matches!(
            self,
            Self::Healthcare | Self::Utilities | Self::Insurance | Self::Education
        )
    }

    /// Optional spending where a decrease is healthy
    pub fn is_discretionary(&self) -> bool {
        matches!(self, Self::Entertainment | Self::Shopping | Self::Travel)
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reject batches containing non-finite or negative amounts
///
/// Bad rows are never skipped: the first offending position is reported.
pub fn validate_batch(transactions: &[Transaction]) -> Result<()> {
    for (index, tx) in transactions.iter().enumerate() {
        validate_amount(index, tx.amount)?;
    }
    Ok(())
}

pub(crate) fn validate_amount(index: usize, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { index, amount });
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDateFormat(s.to_string()))
}

/// Round a currency value to cents for display
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serialize a currency value rounded to cents
pub fn serialize_money<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_money(*value))
}
