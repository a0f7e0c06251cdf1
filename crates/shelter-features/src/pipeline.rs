//! Encoder, scaler and classifier composed into one fitted transformation

use crate::encoder::{CategoricalEncoder, EncodedRow, StandardScaler};
use crate::features::{FeatureVector, Label};
use crate::model::{LogisticRegression, LogisticRegressionConfig};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shelter_core::{Error, Result};
use tracing::info;

/// Fitted adoption classifier: feature vector in, probability out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionPipeline {
    encoder: CategoricalEncoder,
    scaler: StandardScaler,
    classifier: LogisticRegression,
}

impl AdoptionPipeline {
    /// Fit the encoder, scaler and classifier on the same rows
    pub fn fit(
        rows: &[FeatureVector],
        labels: &[Label],
        config: &LogisticRegressionConfig,
    ) -> Result<Self> {
        let encoder = CategoricalEncoder::fit(rows);
        let scaler = StandardScaler::fit(rows);

        let encoded: Vec<EncodedRow> = rows
            .iter()
            .map(|row| EncodedRow {
                active: encoder.encode(row),
                numeric: scaler.transform(row),
            })
            .collect();

        let classifier = LogisticRegression::fit(&encoded, labels, encoder.width(), config)?;

        info!(
            "Fitted adoption pipeline on {} rows ({} indicator columns)",
            rows.len(),
            encoder.width()
        );

        Ok(Self {
            encoder,
            scaler,
            classifier,
        })
    }

    /// Encode a row the way the classifier expects it
    pub fn transform(&self, row: &FeatureVector) -> EncodedRow {
        EncodedRow {
            active: self.encoder.encode(row),
            numeric: self.scaler.transform(row),
        }
    }

    /// Probability that the animal is adopted
    pub fn predict_proba(&self, row: &FeatureVector) -> Result<f64> {
        let encoded = self.transform(row);
        if encoded.numeric.iter().any(|x| !x.is_finite()) {
            return Err(Error::inference(format!(
                "non-finite numeric feature (outcome_month={}, age_weeks={})",
                row.outcome_month, row.age_weeks
            )));
        }

        let proba = self.classifier.predict_proba(&encoded);
        if !(0.0..=1.0).contains(&proba) {
            return Err(Error::inference(format!("probability out of range: {}", proba)));
        }
        Ok(proba)
    }

    /// Hard prediction at the 0.5 threshold
    pub fn predict(&self, row: &FeatureVector) -> Result<Label> {
        Ok(if self.predict_proba(row)? >= 0.5 {
            Label::Adopted
        } else {
            Label::NotAdopted
        })
    }

    /// Fraction of rows predicted correctly
    pub fn score(&self, rows: &[FeatureVector], labels: &[Label]) -> Result<f64> {
        let predicted = rows
            .iter()
            .map(|row| self.predict(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(accuracy(&predicted, labels))
    }

    /// Check internal consistency after deserialisation
    pub fn validate(&self) -> Result<()> {
        if !self.encoder.is_well_formed() {
            return Err(Error::inference("encoder vocabularies are malformed"));
        }
        let expected = self.encoder.width() + crate::features::NUMERIC_FEATURES.len();
        if self.classifier.dimension() != expected {
            return Err(Error::inference(format!(
                "classifier has {} weights, encoder produces {} columns",
                self.classifier.dimension(),
                expected
            )));
        }
        Ok(())
    }

    /// SHA-256 of the serialised pipeline, hex encoded
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }

    pub fn encoder(&self) -> &CategoricalEncoder {
        &self.encoder
    }
}

/// Fraction of positions where prediction and truth agree
pub fn accuracy(predicted: &[Label], actual: &[Label]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| p == a)
        .count();
    correct as f64 / actual.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(animal: &str, breed: &str, month: u32, age: f64) -> FeatureVector {
        FeatureVector {
            animal_type: animal.into(),
            sex_upon_outcome: "Neutered Male".into(),
            primary_breed: breed.into(),
            outcome_month: month,
            age_weeks: age,
        }
    }

    fn training_set() -> (Vec<FeatureVector>, Vec<Label>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..30 {
            // Young dogs get adopted, old cats get transferred
            if i % 2 == 0 {
                rows.push(fv("Dog", "Beagle", (i % 12) as u32 + 1, 8.0 + i as f64));
                labels.push(Label::Adopted);
            } else {
                rows.push(fv("Cat", "Siamese", (i % 12) as u32 + 1, 300.0 + i as f64));
                labels.push(Label::NotAdopted);
            }
        }
        (rows, labels)
    }

    #[test]
    fn test_fit_and_predict() {
        let (rows, labels) = training_set();
        let pipeline =
            AdoptionPipeline::fit(&rows, &labels, &LogisticRegressionConfig::default()).unwrap();

        assert_eq!(pipeline.score(&rows, &labels).unwrap(), 1.0);
        assert!(pipeline.predict_proba(&fv("Dog", "Beagle", 3, 10.0)).unwrap() > 0.5);
        assert!(pipeline.predict_proba(&fv("Cat", "Siamese", 3, 320.0)).unwrap() < 0.5);
        pipeline.validate().unwrap();
    }

    #[test]
    fn test_unknown_categories_do_not_fail() {
        let (rows, labels) = training_set();
        let pipeline =
            AdoptionPipeline::fit(&rows, &labels, &LogisticRegressionConfig::default()).unwrap();

        let novel = FeatureVector {
            animal_type: "Bird".into(),
            sex_upon_outcome: "Unknown".into(),
            primary_breed: "Cockatiel".into(),
            outcome_month: 7,
            age_weeks: 20.0,
        };
        assert!(pipeline.transform(&novel).active.is_empty());

        let proba = pipeline.predict_proba(&novel).unwrap();
        assert!((0.0..=1.0).contains(&proba));
    }

    #[test]
    fn test_non_finite_input_is_inference_error() {
        let (rows, labels) = training_set();
        let pipeline =
            AdoptionPipeline::fit(&rows, &labels, &LogisticRegressionConfig::default()).unwrap();

        let err = pipeline
            .predict_proba(&fv("Dog", "Beagle", 3, f64::NAN))
            .unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let (rows, labels) = training_set();
        let config = LogisticRegressionConfig::default();
        let a = AdoptionPipeline::fit(&rows, &labels, &config).unwrap();
        let b = AdoptionPipeline::fit(&rows, &labels, &config).unwrap();

        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn test_accuracy() {
        use Label::*;
        assert_eq!(accuracy(&[Adopted, NotAdopted], &[Adopted, Adopted]), 0.5);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }
}
