//! Service configuration

use serde::{Deserialize, Serialize};
use shelter_features::DEFAULT_ARTIFACT_PATH;
use shelter_store::StoreConfig;
use std::path::{Path, PathBuf};

/// Prediction service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Trained artifact to load at startup
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Record store backing the dashboard endpoints; disabled when absent
    #[serde(default)]
    pub store: Option<StoreConfig>,

    /// Maximum accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Allowed CORS origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl ServiceConfig {
    /// Load configuration from file, or defaults when the file does not exist
    pub fn load(config_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            store: None,
            max_body_bytes: default_max_body_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_PATH)
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::load("/nonexistent/service.yaml").unwrap();
        assert_eq!(config.model_path, PathBuf::from("adoption_model.json"));
        assert!(config.store.is_none());
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_store_section_enables_dashboard() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("service.yaml");
        std::fs::write(
            &path,
            r#"
model_path: /srv/models/adoption_model.json
store:
  data_dir: /srv/data
cors_origins:
  - http://localhost:4200
"#,
        )
        .unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(
            config.model_path,
            PathBuf::from("/srv/models/adoption_model.json")
        );
        let store = config.store.unwrap();
        assert_eq!(store.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(store.collection, "animals");
        assert_eq!(config.cors_origins, vec!["http://localhost:4200"]);
    }
}
