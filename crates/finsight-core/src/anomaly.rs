//! Batch-relative anomaly detection
//!
//! Every call fits a fresh isolation forest on (amount, weekday, month) of the
//! batch it is given and flags the most isolated transactions. Nothing is
//! carried between calls, so whether a transaction is anomalous depends on the
//! batch it arrived in.

use tracing::debug;

use crate::config::AnomalyConfig;
use crate::error::Result;
use crate::features::FeatureVector;
use crate::ml::{percentile, IsolationForest};
use crate::models::{validate_batch, Transaction};

/// Stateless anomaly detector
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Positional indices of flagged transactions, in batch order
    ///
    /// Batches below `min_batch` return an empty list.
    pub fn detect(&self, batch: &[Transaction]) -> Result<Vec<usize>> {
        Ok(self
            .detect_scored(batch)?
            .into_iter()
            .map(|(index, _)| index)
            .collect())
    }

    /// Flagged positions paired with their anomaly scores, in batch order
    pub fn detect_scored(&self, batch: &[Transaction]) -> Result<Vec<(usize, f64)>> {
        let Some(scores) = self.score_batch(batch)? else {
            return Ok(Vec::new());
        };

        // Flag scores above the (1 - contamination) quantile, computed on
        // negated scores so interpolation matches the low-tail definition
        let negated: Vec<f64> = scores.iter().map(|s| -s).collect();
        let offset = percentile(&negated, 100.0 * self.config.contamination);

        let flagged: Vec<(usize, f64)> = scores
            .iter()
            .enumerate()
            .filter(|(_, &s)| -s < offset)
            .map(|(i, &s)| (i, s))
            .collect();

        debug!(
            batch = batch.len(),
            flagged = flagged.len(),
            "Anomaly detection complete"
        );
        Ok(flagged)
    }

    /// Anomaly score per transaction, or None when the batch is too small
    pub fn score_batch(&self, batch: &[Transaction]) -> Result<Option<Vec<f64>>> {
        validate_batch(batch)?;
        if batch.len() < self.config.min_batch {
            return Ok(None);
        }

        let rows: Vec<Vec<f64>> = batch
            .iter()
            .map(|tx| FeatureVector::from_transaction(tx).anomaly_row().to_vec())
            .collect();

        let forest = IsolationForest::fit(&rows, &self.config.isolation_params());
        Ok(Some(rows.iter().map(|row| forest.score(row)).collect()))
    }
}
