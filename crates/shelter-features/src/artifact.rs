//! Persisted training output
//!
//! An artifact is one JSON document holding the fitted pipeline and the
//! metadata of the run that produced it. It is written to a temporary file
//! and renamed into place, so readers never observe a partial write.

use crate::features::FEATURE_COLUMNS;
use crate::pipeline::AdoptionPipeline;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelter_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Current on-disk layout
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Default artifact location
pub const DEFAULT_ARTIFACT_PATH: &str = "adoption_model.json";

/// Fitted pipeline plus provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedArtifact {
    pub format_version: u32,

    /// Serving row layout the pipeline was trained against
    pub feature_columns: Vec<String>,

    pub pipeline: AdoptionPipeline,

    pub metadata: ArtifactMetadata,
}

/// Facts about the training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub trained_at: DateTime<Utc>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub dropped_rows: usize,
    pub test_accuracy: f64,
    pub seed: u64,
    pub test_ratio: f64,

    /// SHA-256 of the serialised pipeline
    pub fingerprint: String,
}

impl TrainedArtifact {
    /// Bundle a fitted pipeline; the fingerprint is filled in here
    pub fn new(pipeline: AdoptionPipeline, mut metadata: ArtifactMetadata) -> Result<Self> {
        metadata.fingerprint = pipeline.fingerprint()?;
        Ok(Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            pipeline,
            metadata,
        })
    }

    /// Write the artifact atomically
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = temp_path(path);
        std::fs::write(&tmp, &bytes)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!(
            "Saved artifact {} ({} bytes) to {:?}",
            self.metadata.fingerprint,
            bytes.len(),
            path
        );
        Ok(())
    }

    /// Read and validate an artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let artifact: Self = serde_json::from_slice(&bytes)?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(Error::config(format!(
                "unsupported artifact format version {} (expected {})",
                artifact.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        if artifact.feature_columns != FEATURE_COLUMNS {
            return Err(Error::config(format!(
                "artifact feature layout {:?} does not match {:?}",
                artifact.feature_columns, FEATURE_COLUMNS
            )));
        }
        artifact.pipeline.validate()?;

        let fingerprint = artifact.pipeline.fingerprint()?;
        if fingerprint != artifact.metadata.fingerprint {
            warn!(
                "Artifact {:?} fingerprint mismatch: recorded {}, computed {}",
                path, artifact.metadata.fingerprint, fingerprint
            );
        }

        info!("Loaded artifact {} from {:?}", fingerprint, path);
        Ok(artifact)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureVector, Label};
    use crate::model::LogisticRegressionConfig;
    use tempfile::TempDir;

    fn fitted() -> AdoptionPipeline {
        let rows: Vec<FeatureVector> = (0..10)
            .map(|i| FeatureVector {
                animal_type: if i % 2 == 0 { "Dog" } else { "Cat" }.into(),
                sex_upon_outcome: "Spayed Female".into(),
                primary_breed: "Domestic Shorthair".into(),
                outcome_month: (i % 12) + 1,
                age_weeks: 10.0 * i as f64,
            })
            .collect();
        let labels: Vec<Label> = (0..10)
            .map(|i| if i % 2 == 0 { Label::Adopted } else { Label::NotAdopted })
            .collect();
        AdoptionPipeline::fit(&rows, &labels, &LogisticRegressionConfig::default()).unwrap()
    }

    fn metadata() -> ArtifactMetadata {
        ArtifactMetadata {
            trained_at: Utc::now(),
            train_rows: 8,
            test_rows: 2,
            dropped_rows: 0,
            test_accuracy: 1.0,
            seed: 42,
            test_ratio: 0.2,
            fingerprint: String::new(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models").join("adoption_model.json");

        let artifact = TrainedArtifact::new(fitted(), metadata()).unwrap();
        artifact.save(&path).unwrap();

        assert!(path.exists());
        assert!(!temp_path(&path).exists());

        let loaded = TrainedArtifact::load(&path).unwrap();
        assert_eq!(loaded.pipeline, artifact.pipeline);
        assert_eq!(loaded.metadata, artifact.metadata);
        assert_eq!(loaded.metadata.fingerprint.len(), 64);
    }

    #[test]
    fn test_load_rejects_foreign_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adoption_model.json");

        let mut artifact = TrainedArtifact::new(fitted(), metadata()).unwrap();
        artifact.format_version = 99;
        std::fs::write(&path, serde_json::to_vec(&artifact).unwrap()).unwrap();

        assert!(matches!(TrainedArtifact::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adoption_model.json");
        std::fs::write(&path, b"\x80\x04pickle").unwrap();

        assert!(matches!(
            TrainedArtifact::load(&path),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            TrainedArtifact::load(temp_dir.path().join("absent.json")),
            Err(Error::Io(_))
        ));
    }
}
