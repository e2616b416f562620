//! Tree ensembles used by the category classifier and anomaly detector
//!
//! - `forest` - random forest classifier (bootstrap, Gini splits)
//! - `isolation` - isolation forest outlier scorer
//!
//! Both are seeded and deterministic: the same rows and seed always produce
//! the same fitted ensemble.

pub mod forest;
pub mod isolation;

pub use forest::{ForestParams, RandomForest};
pub use isolation::{IsolationForest, IsolationParams};

/// Percentile with linear interpolation between closest ranks
///
/// `q` is in `[0, 100]`. Returns 0.0 for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
