//! Engine configuration
//!
//! Model hyperparameters and minimum batch sizes for each component.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override (explicit path, else ~/.local/share/finsight/config/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ml::{ForestParams, IsolationParams};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Category classifier settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub trees: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    /// Minimum labeled transactions needed to train
    pub min_training_samples: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            seed: 42,
            max_depth: None,
            min_training_samples: 10,
        }
    }
}

impl ClassifierConfig {
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            trees: self.trees,
            seed: self.seed,
            max_depth: self.max_depth,
        }
    }
}

/// Anomaly detector settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyConfig {
    pub trees: usize,
    pub seed: u64,
    pub max_samples: usize,
    /// Expected fraction of anomalies per batch
    pub contamination: f64,
    /// Batches below this size yield no anomalies
    pub min_batch: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            seed: 42,
            max_samples: 256,
            contamination: 0.1,
            min_batch: 5,
        }
    }
}

impl AnomalyConfig {
    pub fn isolation_params(&self) -> IsolationParams {
        IsolationParams {
            trees: self.trees,
            seed: self.seed,
            max_samples: self.max_samples,
        }
    }
}

/// Spend forecaster settings
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Number of most recent daily totals to average
    pub window_days: usize,
    pub min_transactions: usize,
    pub min_days: usize,
    /// Reported confidence (a fixed value, not derived from variance)
    pub confidence: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            min_transactions: 30,
            min_days: 30,
            confidence: 0.85,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub anomaly: AnomalyConfig,
    pub forecast: ForecastConfig,
}

impl EngineConfig {
    /// Load from the default override location or embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit override path (embedded defaults if missing)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("finsight").join("config").join("engine.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<EngineConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let content = match path {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading engine config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    classifier: Option<RawClassifier>,
    anomaly: Option<RawAnomaly>,
    forecast: Option<RawForecast>,
}

#[derive(Debug, Deserialize)]
struct RawClassifier {
    trees: Option<usize>,
    seed: Option<u64>,
    max_depth: Option<usize>,
    min_training_samples: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawAnomaly {
    trees: Option<usize>,
    seed: Option<u64>,
    max_samples: Option<usize>,
    contamination: Option<f64>,
    min_batch: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    window_days: Option<usize>,
    min_transactions: Option<usize>,
    min_days: Option<usize>,
    confidence: Option<f64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(classifier) = raw.classifier {
        let c = &mut config.classifier;
        c.trees = classifier.trees.unwrap_or(c.trees);
        c.seed = classifier.seed.unwrap_or(c.seed);
        c.max_depth = classifier.max_depth.or(c.max_depth);
        c.min_training_samples = classifier
            .min_training_samples
            .unwrap_or(c.min_training_samples);
    }

    if let Some(anomaly) = raw.anomaly {
        let a = &mut config.anomaly;
        a.trees = anomaly.trees.unwrap_or(a.trees);
        a.seed = anomaly.seed.unwrap_or(a.seed);
        a.max_samples = anomaly.max_samples.unwrap_or(a.max_samples);
        a.contamination = anomaly.contamination.unwrap_or(a.contamination);
        a.min_batch = anomaly.min_batch.unwrap_or(a.min_batch);
    }

    if let Some(forecast) = raw.forecast {
        let f = &mut config.forecast;
        f.window_days = forecast.window_days.unwrap_or(f.window_days);
        f.min_transactions = forecast.min_transactions.unwrap_or(f.min_transactions);
        f.min_days = forecast.min_days.unwrap_or(f.min_days);
        f.confidence = forecast.confidence.unwrap_or(f.confidence);
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &EngineConfig) -> Result<()> {
    let positive = [
        ("classifier.trees", config.classifier.trees),
        (
            "classifier.min_training_samples",
            config.classifier.min_training_samples,
        ),
        ("anomaly.trees", config.anomaly.trees),
        ("anomaly.max_samples", config.anomaly.max_samples),
        ("anomaly.min_batch", config.anomaly.min_batch),
        ("forecast.window_days", config.forecast.window_days),
        ("forecast.min_transactions", config.forecast.min_transactions),
        ("forecast.min_days", config.forecast.min_days),
    ];
    if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
        return Err(Error::Config(format!("{} must be at least 1", key)));
    }

    if !(0.0..=0.5).contains(&config.anomaly.contamination) {
        return Err(Error::Config(format!(
            "anomaly.contamination must be in [0, 0.5], got {}",
            config.anomaly.contamination
        )));
    }
    if !(0.0..=1.0).contains(&config.forecast.confidence) {
        return Err(Error::Config(format!(
            "forecast.confidence must be in [0, 1], got {}",
            config.forecast.confidence
        )));
    }
    if config.classifier.max_depth == Some(0) {
        return Err(Error::Config("classifier.max_depth must be at least 1".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [classifier]
            trees = 12
            max_depth = 6

            [forecast]
            confidence = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.classifier.trees, 12);
        assert_eq!(config.classifier.max_depth, Some(6));
        assert_eq!(config.classifier.seed, 42);
        assert_eq!(config.forecast.confidence, 0.5);
        assert_eq!(config.forecast.min_days, 30);
        assert_eq!(config.anomaly, AnomalyConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            parse_config("[classifier\ntrees = 1"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_contamination_out_of_range() {
        let err = parse_config("[anomaly]\ncontamination = 0.9").unwrap_err();
        assert!(err.to_string().contains("contamination"));
    }

    #[test]
    fn test_zero_minimums_rejected() {
        for (toml, key) in [
            ("[forecast]\nmin_transactions = 0", "forecast.min_transactions"),
            ("[forecast]\nmin_days = 0", "forecast.min_days"),
            ("[forecast]\nwindow_days = 0", "forecast.window_days"),
            (
                "[classifier]\nmin_training_samples = 0",
                "classifier.min_training_samples",
            ),
            ("[anomaly]\nmin_batch = 0", "anomaly.min_batch"),
            ("[anomaly]\nmax_samples = 0", "anomaly.max_samples"),
        ] {
            match parse_config(toml) {
                Err(Error::Config(msg)) => assert!(msg.contains(key), "{}", msg),
                other => panic!("expected config error for {}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_zero_trees_rejected() {
        assert!(matches!(
            parse_config("[classifier]\ntrees = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("[anomaly]\ntrees = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("[classifier]\nmax_depth = 0"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_confidence_out_of_range() {
        let err = parse_config("[forecast]\nconfidence = 1.5").unwrap_err();
        assert!(err.to_string().contains("confidence"));
        assert!(parse_config("[forecast]\nconfidence = -0.1").is_err());
        assert!(parse_config("[forecast]\nconfidence = 1.0").is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[anomaly]\nmin_batch = 8").unwrap();

        let config = EngineConfig::load_from(file.path()).unwrap();
        assert_eq!(config.anomaly.min_batch, 8);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_params_conversion() {
        let config = EngineConfig::default();
        assert_eq!(config.classifier.forest_params(), ForestParams::default());
        assert_eq!(config.anomaly.isolation_params(), IsolationParams::default());
    }
}
