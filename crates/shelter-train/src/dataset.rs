//! Raw records to labelled feature rows

use shelter_core::Document;
use shelter_features::{extract_features, extract_label, FeatureVector, Label};
use tracing::debug;

/// Rows that survived feature extraction, with their labels
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<FeatureVector>,
    pub labels: Vec<Label>,

    /// Records skipped because a feature could not be derived
    pub dropped: usize,
}

impl Dataset {
    /// Extract features and labels, skipping records that fail to parse
    pub fn from_records(records: &[Document]) -> Self {
        let mut dataset = Self {
            rows: Vec::with_capacity(records.len()),
            labels: Vec::with_capacity(records.len()),
            dropped: 0,
        };

        for record in records {
            match extract_features(record) {
                Ok(row) => {
                    dataset.rows.push(row);
                    dataset.labels.push(extract_label(record));
                }
                Err(e) => {
                    debug!("Dropping record: {}", e);
                    dataset.dropped += 1;
                }
            }
        }

        dataset
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows and labels at the given positions, in that order
    pub fn select(&self, indices: &[usize]) -> (Vec<FeatureVector>, Vec<Label>) {
        indices
            .iter()
            .map(|&i| (self.rows[i].clone(), self.labels[i]))
            .unzip()
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|l| **l == Label::Adopted).count()
    }
}
