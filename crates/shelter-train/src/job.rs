//! The offline training job
//!
//! Reads eligible outcome records, derives features, fits the adoption
//! pipeline on a seeded 80/20 split, evaluates it on the held-out rows and
//! persists the result as a single artifact file.

use crate::config::TrainingConfig;
use crate::dataset::Dataset;
use crate::split::train_test_split;
use chrono::Utc;
use serde::Serialize;
use shelter_core::{Error, Result};
use shelter_features::{AdoptionPipeline, ArtifactMetadata, TrainedArtifact};
use shelter_store::AnimalShelter;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Records returned by the store
    pub records: usize,

    /// Records skipped during feature extraction
    pub dropped: usize,

    pub train_rows: usize,
    pub test_rows: usize,

    /// Accuracy on the held-out partition
    pub accuracy: f64,

    pub fingerprint: String,
    pub artifact_path: PathBuf,
}

pub struct TrainingJob {
    shelter: AnimalShelter,
    config: TrainingConfig,
}

impl TrainingJob {
    pub fn new(shelter: AnimalShelter, config: TrainingConfig) -> Self {
        Self { shelter, config }
    }

    /// Train, evaluate and persist
    pub async fn run(&self) -> Result<TrainingReport> {
        let (artifact, records) = self.train().await?;
        artifact.save(&self.config.output_path)?;

        let metadata = &artifact.metadata;
        let report = TrainingReport {
            records,
            dropped: metadata.dropped_rows,
            train_rows: metadata.train_rows,
            test_rows: metadata.test_rows,
            accuracy: metadata.test_accuracy,
            fingerprint: metadata.fingerprint.clone(),
            artifact_path: self.config.output_path.clone(),
        };

        info!(
            "Model trained. Accuracy: {:.4} ({} train / {} test rows), saved to {:?}",
            report.accuracy, report.train_rows, report.test_rows, report.artifact_path
        );
        Ok(report)
    }

    /// Fit and evaluate without writing anything.
    ///
    /// Returns the artifact and the number of records read from the store.
    pub async fn train(&self) -> Result<(TrainedArtifact, usize)> {
        self.config.validate()?;
        let start = Instant::now();

        let records = self.shelter.read_training_records().await?;
        if records.is_empty() {
            return Err(Error::no_data("no eligible training records in the store"));
        }
        info!("Fetched {} training records", records.len());

        let dataset = Dataset::from_records(&records);
        if dataset.dropped > 0 {
            warn!(
                "Dropped {} of {} records with unparseable features",
                dataset.dropped,
                records.len()
            );
        }
        if dataset.is_empty() {
            return Err(Error::no_data(
                "every training record failed feature extraction",
            ));
        }

        let split = train_test_split(dataset.len(), self.config.test_ratio, self.config.seed)?;
        let (train_rows, train_labels) = dataset.select(&split.train);
        let (test_rows, test_labels) = dataset.select(&split.test);

        let pipeline = AdoptionPipeline::fit(&train_rows, &train_labels, &self.config.classifier)?;
        let accuracy = pipeline.score(&test_rows, &test_labels)?;

        let artifact = TrainedArtifact::new(
            pipeline,
            ArtifactMetadata {
                trained_at: Utc::now(),
                train_rows: train_rows.len(),
                test_rows: test_rows.len(),
                dropped_rows: dataset.dropped,
                test_accuracy: accuracy,
                seed: self.config.seed,
                test_ratio: self.config.test_ratio,
                fingerprint: String::new(),
            },
        )?;

        info!(
            "Fitted pipeline {} in {:?} ({} adopted of {} rows)",
            artifact.metadata.fingerprint,
            start.elapsed(),
            dataset.positives(),
            dataset.len()
        );

        Ok((artifact, records.len()))
    }
}
