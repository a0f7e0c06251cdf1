//! Training configuration

use serde::{Deserialize, Serialize};
use shelter_core::{Error, Result};
use shelter_features::{LogisticRegressionConfig, DEFAULT_ARTIFACT_PATH};
use shelter_store::StoreConfig;
use std::path::{Path, PathBuf};

/// Settings for one training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Where the outcome records live
    #[serde(default)]
    pub store: StoreConfig,

    /// Artifact destination
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Seed for the train/test shuffle
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Fraction of rows held out for evaluation
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,

    /// Classifier fitting parameters
    #[serde(default)]
    pub classifier: LogisticRegressionConfig,
}

impl TrainingConfig {
    /// Load from a YAML file, or fall back to defaults when it does not exist
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {}", config_path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the split cannot honour
    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(Error::config(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            output_path: default_output_path(),
            seed: default_seed(),
            test_ratio: default_test_ratio(),
            classifier: LogisticRegressionConfig::default(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_PATH)
}

fn default_seed() -> u64 {
    42
}

fn default_test_ratio() -> f64 {
    0.2
}
