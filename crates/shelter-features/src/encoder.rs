//! Categorical one-hot encoding and numeric scaling

use crate::features::{FeatureVector, CATEGORICAL_FEATURES, NUMERIC_FEATURES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const NUM_CATEGORICAL: usize = CATEGORICAL_FEATURES.len();
const NUM_NUMERIC: usize = NUMERIC_FEATURES.len();

/// One encoded row: indices of active indicators plus scaled numerics
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow {
    /// Active one-hot columns, ascending
    pub active: Vec<usize>,

    /// Scaled numeric columns in [`NUMERIC_FEATURES`] order
    pub numeric: [f64; NUM_NUMERIC],
}

/// One-hot encoder with a fixed, sorted vocabulary per categorical field.
///
/// Values outside the vocabulary activate no column, so an unseen breed
/// encodes as an all-zero block instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    vocabularies: Vec<Vec<String>>,
}

impl CategoricalEncoder {
    /// Build vocabularies from the observed values
    pub fn fit<'a>(rows: impl IntoIterator<Item = &'a FeatureVector>) -> Self {
        let mut seen: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); NUM_CATEGORICAL];
        for row in rows {
            for (set, value) in seen.iter_mut().zip(row.categorical()) {
                set.insert(value);
            }
        }

        Self {
            vocabularies: seen
                .into_iter()
                .map(|set| set.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    /// Total number of indicator columns
    pub fn width(&self) -> usize {
        self.vocabularies.iter().map(Vec::len).sum()
    }

    /// Vocabulary of one categorical field
    pub fn categories(&self, field: &str) -> Option<&[String]> {
        CATEGORICAL_FEATURES
            .iter()
            .position(|f| *f == field)
            .and_then(|i| self.vocabularies.get(i))
            .map(Vec::as_slice)
    }

    /// Indices of the active indicator columns for a row
    pub fn encode(&self, row: &FeatureVector) -> Vec<usize> {
        let mut active = Vec::with_capacity(NUM_CATEGORICAL);
        let mut offset = 0;

        for (vocabulary, value) in self.vocabularies.iter().zip(row.categorical()) {
            if let Ok(pos) = vocabulary.binary_search_by(|v| v.as_str().cmp(value)) {
                active.push(offset + pos);
            }
            offset += vocabulary.len();
        }

        active
    }

    /// True when the encoder has one vocabulary per categorical field
    pub fn is_well_formed(&self) -> bool {
        self.vocabularies.len() == NUM_CATEGORICAL
            && self
                .vocabularies
                .iter()
                .all(|v| v.windows(2).all(|w| w[0] < w[1]))
    }
}

/// Per-column standardisation of the numeric features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: [f64; NUM_NUMERIC],
    scales: [f64; NUM_NUMERIC],
}

impl StandardScaler {
    /// Compute means and (population) standard deviations; a constant column
    /// gets a scale of 1
    pub fn fit<'a>(rows: impl IntoIterator<Item = &'a FeatureVector>) -> Self {
        let mut count = 0usize;
        let mut sums = [0.0; NUM_NUMERIC];
        let mut sq_sums = [0.0; NUM_NUMERIC];

        for row in rows {
            count += 1;
            for (j, x) in row.numeric().into_iter().enumerate() {
                sums[j] += x;
                sq_sums[j] += x * x;
            }
        }

        let mut means = [0.0; NUM_NUMERIC];
        let mut scales = [1.0; NUM_NUMERIC];
        if count > 0 {
            let n = count as f64;
            for j in 0..NUM_NUMERIC {
                means[j] = sums[j] / n;
                let variance = (sq_sums[j] / n - means[j] * means[j]).max(0.0);
                let std = variance.sqrt();
                if std > f64::EPSILON {
                    scales[j] = std;
                }
            }
        }

        Self { means, scales }
    }

    pub fn transform(&self, row: &FeatureVector) -> [f64; NUM_NUMERIC] {
        let mut out = row.numeric();
        for (j, x) in out.iter_mut().enumerate() {
            *x = (*x - self.means[j]) / self.scales[j];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(animal: &str, sex: &str, breed: &str, month: u32, age: f64) -> FeatureVector {
        FeatureVector {
            animal_type: animal.into(),
            sex_upon_outcome: sex.into(),
            primary_breed: breed.into(),
            outcome_month: month,
            age_weeks: age,
        }
    }

    #[test]
    fn test_vocabulary_is_sorted_and_deduplicated() {
        let rows = vec![
            fv("Dog", "Intact Male", "Pug", 1, 10.0),
            fv("Cat", "Spayed Female", "Siamese", 2, 20.0),
            fv("Dog", "Intact Male", "Beagle", 3, 30.0),
        ];
        let encoder = CategoricalEncoder::fit(&rows);

        assert_eq!(encoder.categories("animal_type").unwrap(), ["Cat", "Dog"]);
        assert_eq!(
            encoder.categories("primary_breed").unwrap(),
            ["Beagle", "Pug", "Siamese"]
        );
        assert_eq!(encoder.width(), 2 + 2 + 3);
        assert!(encoder.is_well_formed());
    }

    #[test]
    fn test_encode_known_values() {
        let rows = vec![
            fv("Dog", "Intact Male", "Pug", 1, 10.0),
            fv("Cat", "Spayed Female", "Siamese", 2, 20.0),
        ];
        let encoder = CategoricalEncoder::fit(&rows);

        // Cat=0 Dog=1 | Intact Male=2 Spayed Female=3 | Pug=4 Siamese=5
        assert_eq!(encoder.encode(&rows[0]), vec![1, 2, 4]);
        assert_eq!(encoder.encode(&rows[1]), vec![0, 3, 5]);
    }

    #[test]
    fn test_unknown_category_is_all_zero() {
        let rows = vec![fv("Dog", "Intact Male", "Pug", 1, 10.0)];
        let encoder = CategoricalEncoder::fit(&rows);

        let novel = fv("Dog", "Intact Male", "Xoloitzcuintli", 6, 5.0);
        assert_eq!(encoder.encode(&novel), vec![0, 1]);

        let all_novel = fv("Bird", "Unknown", "Parrot", 6, 5.0);
        assert!(encoder.encode(&all_novel).is_empty());
    }

    #[test]
    fn test_scaler_standardises() {
        let rows = vec![fv("Dog", "M", "Pug", 2, 10.0), fv("Dog", "M", "Pug", 4, 30.0)];
        let scaler = StandardScaler::fit(&rows);

        assert_eq!(scaler.transform(&rows[0]), [-1.0, -1.0]);
        assert_eq!(scaler.transform(&rows[1]), [1.0, 1.0]);
    }

    #[test]
    fn test_scaler_constant_column() {
        let rows = vec![fv("Dog", "M", "Pug", 5, 10.0), fv("Dog", "M", "Pug", 5, 10.0)];
        let scaler = StandardScaler::fit(&rows);
        assert_eq!(scaler.transform(&rows[0]), [0.0, 0.0]);
    }
}
