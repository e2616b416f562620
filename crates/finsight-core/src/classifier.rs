//! Category classifier
//!
//! A random forest over (amount, merchant bucket, weekday, month) that maps a
//! transaction to one of the category labels it was trained on.
//!
//! A fitted [`CategoryClassifier`] is immutable. [`ClassifierHandle`] holds
//! the current snapshot: training fits a new snapshot without holding any
//! lock and then swaps it in, so predictions never observe a half-trained
//! model.

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use crate::features::FeatureVector;
use crate::ml::RandomForest;
use crate::models::{validate_batch, Transaction};

/// Bidirectional mapping between category labels and class indices
///
/// Labels are sorted so the encoding does not depend on batch order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    labels: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        Self::fit_encode(&labels).0
    }

    /// Fit on `labels` and encode them in one pass
    ///
    /// `classes[i]` is the class of `labels[i]`. Classes are assigned while
    /// walking the sorted labels, so every input gets one.
    pub fn fit_encode(labels: &[&str]) -> (Self, Vec<usize>) {
        let mut order: Vec<usize> = (0..labels.len()).collect();
        order.sort_by(|&a, &b| labels[a].cmp(labels[b]));

        let mut sorted: Vec<String> = Vec::new();
        let mut classes = vec![0; labels.len()];
        for i in order {
            if sorted.last().map(String::as_str) != Some(labels[i]) {
                sorted.push(labels[i].to_string());
            }
            classes[i] = sorted.len() - 1;
        }

        (Self { labels: sorted }, classes)
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A fitted category model
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    forest: RandomForest,
    encoder: LabelEncoder,
    training_size: usize,
}

impl CategoryClassifier {
    /// Fit on the labeled transactions of `batch`
    ///
    /// Transactions without a category are ignored. Fails with
    /// `InsufficientData` when fewer than `min_training_samples` are labeled.
    pub fn train(batch: &[Transaction], config: &ClassifierConfig) -> Result<Self> {
        validate_batch(batch)?;

        let labeled: Vec<(&Transaction, &str)> = batch
            .iter()
            .filter_map(|tx| tx.category.as_deref().map(|c| (tx, c)))
            .collect();

        if labeled.len() < config.min_training_samples {
            return Err(Error::insufficient(
                "category training",
                "labeled transactions",
                config.min_training_samples,
                labeled.len(),
            ));
        }

        if labeled.is_empty() {
            return Err(Error::insufficient(
                "category training",
                "labeled transactions",
                1,
                0,
            ));
        }

        let categories: Vec<&str> = labeled.iter().map(|(_, c)| *c).collect();
        let (encoder, targets) = LabelEncoder::fit_encode(&categories);
        let rows: Vec<Vec<f64>> = labeled
            .iter()
            .map(|(tx, _)| FeatureVector::from_transaction(tx).classifier_row().to_vec())
            .collect();

        let forest = RandomForest::fit(
            &rows,
            &targets,
            encoder.len(),
            &config.forest_params(),
        );

        debug!(
            samples = rows.len(),
            classes = encoder.len(),
            trees = forest.n_trees(),
            "Fitted category forest"
        );

        Ok(Self {
            forest,
            encoder,
            training_size: rows.len(),
        })
    }

    /// Predict a category from raw inputs (`date` is `YYYY-MM-DD`)
    pub fn predict(&self, amount: f64, merchant: &str, date: &str) -> Result<String> {
        let features = FeatureVector::derive(amount, merchant, date)?;
        self.predict_features(&features)
    }

    /// Predict a category from an already derived feature vector
    pub fn predict_features(&self, features: &FeatureVector) -> Result<String> {
        let class = self.forest.predict(&features.classifier_row());
        self.encoder
            .decode(class)
            .map(str::to_string)
            .ok_or(Error::ModelNotTrained)
    }

    /// Labels this model can produce
    pub fn labels(&self) -> &[String] {
        self.encoder.labels()
    }

    pub fn training_size(&self) -> usize {
        self.training_size
    }
}

/// Shared, swappable classifier state
#[derive(Debug, Default)]
pub struct ClassifierHandle {
    current: RwLock<Option<Arc<CategoryClassifier>>>,
}

impl ClassifierHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Train a new snapshot and install it
    ///
    /// On failure the previous snapshot (if any) stays in place.
    pub fn train(
        &self,
        batch: &[Transaction],
        config: &ClassifierConfig,
    ) -> Result<Arc<CategoryClassifier>> {
        let model = Arc::new(CategoryClassifier::train(batch, config)?);
        self.install(Arc::clone(&model));
        info!(
            samples = model.training_size(),
            categories = model.labels().len(),
            "Category model trained"
        );
        Ok(model)
    }

    /// Swap in an already fitted snapshot
    pub fn install(&self, model: Arc<CategoryClassifier>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(model);
    }

    /// Current snapshot, if any model has been trained
    pub fn snapshot(&self) -> Option<Arc<CategoryClassifier>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_trained(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Predict with the current snapshot
    pub fn predict(&self, amount: f64, merchant: &str, date: &str) -> Result<String> {
        let model = self.snapshot().ok_or(Error::ModelNotTrained)?;
        model.predict(amount, merchant, date)
    }
}
