//! Shelter Features
//!
//! The feature-engineering and inference contract shared by the training
//! job and the prediction service.
//!
//! This crate provides:
//! - Raw record to `FeatureVector` derivation and label extraction
//! - One-hot encoding with unknown-category tolerance and numeric scaling
//! - An L2-regularised logistic regression classifier
//! - `AdoptionPipeline`, the fitted composition of all of the above
//! - `TrainedArtifact`, the single-file persisted form of a pipeline

pub mod artifact;
pub mod encoder;
pub mod features;
pub mod model;
pub mod pipeline;

pub use artifact::{ArtifactMetadata, TrainedArtifact, ARTIFACT_FORMAT_VERSION, DEFAULT_ARTIFACT_PATH};
pub use encoder::{CategoricalEncoder, EncodedRow, StandardScaler};
pub use features::{
    extract_features, extract_label, primary_breed, AdoptionRequest, FeatureVector, Label,
    CATEGORICAL_FEATURES, FEATURE_COLUMNS, NUMERIC_FEATURES,
};
pub use model::{LogisticRegression, LogisticRegressionConfig};
pub use pipeline::{accuracy, AdoptionPipeline};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifact::TrainedArtifact;
    pub use crate::features::{extract_features, extract_label, AdoptionRequest, FeatureVector, Label};
    pub use crate::pipeline::AdoptionPipeline;
}
