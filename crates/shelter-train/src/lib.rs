//! Shelter Train
//!
//! Offline job that fits the adoption pipeline on stored outcome records
//! and writes the artifact the prediction service loads.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod import;
pub mod job;
pub mod split;

pub use config::TrainingConfig;
pub use dataset::Dataset;
pub use import::{import_documents, parse_documents, read_documents, ImportSummary};
pub use job::{TrainingJob, TrainingReport};
pub use split::{train_test_split, Split};
