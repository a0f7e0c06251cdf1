//! Shared application state

use crate::config::ServiceConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use shelter_features::{AdoptionPipeline, TrainedArtifact};
use shelter_store::AnimalShelter;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// A loaded artifact, read-only for the life of the process
#[derive(Debug)]
pub struct LoadedModel {
    pub pipeline: AdoptionPipeline,
    pub fingerprint: String,
}

impl From<TrainedArtifact> for LoadedModel {
    fn from(artifact: TrainedArtifact) -> Self {
        Self {
            fingerprint: artifact.metadata.fingerprint,
            pipeline: artifact.pipeline,
        }
    }
}

/// Application state shared across all requests
#[derive(Clone, Default)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServiceConfig>,

    /// Fitted pipeline; `None` puts prediction into degraded mode
    pub model: Option<Arc<LoadedModel>>,

    /// Record store for the dashboard endpoints
    pub shelter: Option<AnimalShelter>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// A missing or unreadable artifact, or a store that fails to open, is
    /// logged and leaves the corresponding feature disabled.
    pub fn from_config(config: ServiceConfig, metrics_handle: Option<PrometheusHandle>) -> Self {
        let model = load_model(&config.model_path);

        let shelter = config.store.as_ref().and_then(|store| {
            AnimalShelter::open(store)
                .map_err(|e| warn!("Record store unavailable, dashboard endpoints disabled: {}", e))
                .ok()
        });

        Self {
            config: Arc::new(config),
            model: model.map(Arc::new),
            shelter,
            metrics_handle,
        }
    }

    pub fn with_model(mut self, model: impl Into<LoadedModel>) -> Self {
        self.model = Some(Arc::new(model.into()));
        self
    }

    pub fn with_shelter(mut self, shelter: AnimalShelter) -> Self {
        self.shelter = Some(shelter);
        self
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }
}

/// Load the artifact at `path`, or `None` when it cannot be used
pub fn load_model(path: &Path) -> Option<LoadedModel> {
    if !path.exists() {
        warn!(
            "No model artifact at {:?}; serving default probabilities",
            path
        );
        return None;
    }

    match TrainedArtifact::load(path) {
        Ok(artifact) => {
            info!(
                "Model loaded from {:?} (trained {}, test accuracy {:.4})",
                path, artifact.metadata.trained_at, artifact.metadata.test_accuracy
            );
            Some(artifact.into())
        }
        Err(e) => {
            warn!(
                "Failed to load model from {:?}: {}; serving default probabilities",
                path, e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_artifact_degrades() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_model(&temp_dir.path().join("adoption_model.json")).is_none());
    }

    #[test]
    fn test_corrupt_artifact_degrades() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adoption_model.json");
        std::fs::write(&path, "{\"format_version\": 1").unwrap();

        let state = AppState::from_config(
            ServiceConfig {
                model_path: path,
                ..Default::default()
            },
            None,
        );
        assert!(!state.model_loaded());
        assert!(state.shelter.is_none());
    }
}
