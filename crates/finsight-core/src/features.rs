//! Feature derivation shared by the category classifier and anomaly detector
//!
//! Both training and inference build features through this module so the
//! encoding cannot drift between the two paths.

use chrono::{Datelike, NaiveDate};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{parse_iso_date, validate_amount, Transaction};

/// Number of merchant hash buckets
pub const MERCHANT_BUCKETS: u64 = 1000;

/// Numeric features for one transaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub amount: f64,
    /// Hash bucket in `0..MERCHANT_BUCKETS`; distinct merchants may collide
    pub merchant_bucket: u32,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    /// 1..=12
    pub month: u32,
}

impl FeatureVector {
    /// Derive features from raw inputs with a `YYYY-MM-DD` date string
    pub fn derive(amount: f64, merchant: &str, date: &str) -> Result<Self> {
        validate_amount(0, amount)?;
        let date = parse_iso_date(date)?;
        Ok(Self::from_parts(amount, merchant, date))
    }

    /// Derive features from a stored transaction
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self::from_parts(tx.amount, &tx.merchant, tx.day())
    }

    fn from_parts(amount: f64, merchant: &str, date: NaiveDate) -> Self {
        Self {
            amount,
            merchant_bucket: merchant_bucket(merchant),
            day_of_week: date.weekday().num_days_from_monday(),
            month: date.month(),
        }
    }

    /// Classifier features: amount, merchant bucket, weekday, month
    pub fn classifier_row(&self) -> [f64; 4] {
        [
            self.amount,
            self.merchant_bucket as f64,
            self.day_of_week as f64,
            self.month as f64,
        ]
    }

    /// Anomaly features: amount, weekday, month
    pub fn anomaly_row(&self) -> [f64; 3] {
        [self.amount, self.day_of_week as f64, self.month as f64]
    }
}

/// Stable merchant bucket from the leading 8 bytes of SHA-256
pub fn merchant_bucket(merchant: &str) -> u32 {
    let digest = Sha256::digest(merchant.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % MERCHANT_BUCKETS) as u32
}
