//! L2-regularised logistic regression over encoded rows

use crate::encoder::EncodedRow;
use crate::features::Label;
use serde::{Deserialize, Serialize};
use shelter_core::{Error, Result};
use tracing::{debug, warn};

/// Fitting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionConfig {
    /// Inverse regularisation strength
    #[serde(default = "default_c")]
    pub c: f64,

    /// Maximum gradient descent iterations
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// Stop when every gradient component is below this
    #[serde(default = "default_tol")]
    pub tol: f64,

    /// Gradient descent step size
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            c: default_c(),
            max_iter: default_max_iter(),
            tol: default_tol(),
            learning_rate: default_learning_rate(),
        }
    }
}

fn default_c() -> f64 {
    1.0
}

fn default_max_iter() -> usize {
    1000
}

fn default_tol() -> f64 {
    1e-6
}

fn default_learning_rate() -> f64 {
    0.5
}

/// Fitted binary classifier.
///
/// Weight layout: one weight per indicator column, then one per numeric
/// column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Fit with full-batch gradient descent.
    ///
    /// `indicator_width` is the number of one-hot columns produced by the
    /// encoder. Deterministic for a given row order.
    pub fn fit(
        rows: &[EncodedRow],
        labels: &[Label],
        indicator_width: usize,
        config: &LogisticRegressionConfig,
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::training("cannot fit on an empty training set"));
        }
        if rows.len() != labels.len() {
            return Err(Error::training(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let positives = labels.iter().filter(|l| **l == Label::Adopted).count();
        if positives == 0 || positives == labels.len() {
            return Err(Error::training(
                "training data needs samples of both classes",
            ));
        }
        if config.c <= 0.0 || config.learning_rate <= 0.0 {
            return Err(Error::training("c and learning_rate must be positive"));
        }

        let numeric_width = rows[0].numeric.len();
        let dim = indicator_width + numeric_width;
        let n = rows.len() as f64;
        let penalty = 1.0 / (config.c * n);

        let mut model = Self {
            weights: vec![0.0; dim],
            intercept: 0.0,
        };
        let mut grad = vec![0.0; dim];
        let mut converged = false;

        for iteration in 0..config.max_iter {
            grad.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_intercept = 0.0;

            for (row, label) in rows.iter().zip(labels) {
                let error = sigmoid(model.decision(row)) - label.as_f64();
                for &i in &row.active {
                    grad[i] += error;
                }
                for (j, x) in row.numeric.iter().enumerate() {
                    grad[indicator_width + j] += error * x;
                }
                grad_intercept += error;
            }

            let mut max_abs = (grad_intercept / n).abs();
            for (g, w) in grad.iter_mut().zip(&model.weights) {
                *g = *g / n + penalty * w;
                max_abs = max_abs.max(g.abs());
            }

            if max_abs < config.tol {
                debug!("Logistic regression converged after {} iterations", iteration);
                converged = true;
                break;
            }

            for (w, g) in model.weights.iter_mut().zip(&grad) {
                *w -= config.learning_rate * g;
            }
            model.intercept -= config.learning_rate * grad_intercept / n;
        }

        if !converged {
            warn!(
                "Logistic regression did not converge within {} iterations",
                config.max_iter
            );
        }

        Ok(model)
    }

    /// Linear score before the sigmoid
    pub fn decision(&self, row: &EncodedRow) -> f64 {
        let numeric_offset = self.weights.len() - row.numeric.len();
        let indicators: f64 = row.active.iter().map(|&i| self.weights[i]).sum();
        let numeric: f64 = row
            .numeric
            .iter()
            .zip(&self.weights[numeric_offset..])
            .map(|(x, w)| x * w)
            .sum();
        self.intercept + indicators + numeric
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, row: &EncodedRow) -> f64 {
        sigmoid(self.decision(row))
    }

    /// Number of weights (indicator plus numeric columns)
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }
}

/// Logistic function, stable for large |z|
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(active: &[usize], numeric: [f64; 2]) -> EncodedRow {
        EncodedRow {
            active: active.to_vec(),
            numeric,
        }
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(3.0) > 0.9);
    }

    #[test]
    fn test_learns_separable_indicator() {
        // Column 0 marks adopted rows, column 1 marks the rest
        let rows: Vec<EncodedRow> = (0..20)
            .map(|i| if i % 2 == 0 { row(&[0], [0.0, 0.0]) } else { row(&[1], [0.0, 0.0]) })
            .collect();
        let labels: Vec<Label> = (0..20)
            .map(|i| if i % 2 == 0 { Label::Adopted } else { Label::NotAdopted })
            .collect();

        let model =
            LogisticRegression::fit(&rows, &labels, 2, &LogisticRegressionConfig::default())
                .unwrap();

        assert!(model.predict_proba(&rows[0]) > 0.6);
        assert!(model.predict_proba(&rows[1]) < 0.4);
        assert_eq!(model.dimension(), 4);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let rows: Vec<EncodedRow> = (0..12)
            .map(|i| row(&[i % 3], [i as f64 / 6.0 - 1.0, (i % 4) as f64 - 1.5]))
            .collect();
        let labels: Vec<Label> = (0..12)
            .map(|i| if i % 3 == 0 { Label::Adopted } else { Label::NotAdopted })
            .collect();
        let config = LogisticRegressionConfig::default();

        let a = LogisticRegression::fit(&rows, &labels, 3, &config).unwrap();
        let b = LogisticRegression::fit(&rows, &labels, 3, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_class_rejected() {
        let rows = vec![row(&[0], [0.0, 0.0]); 4];
        let labels = vec![Label::Adopted; 4];
        let err = LogisticRegression::fit(&rows, &labels, 1, &LogisticRegressionConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Training(_)));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let rows = vec![row(&[0], [0.0, 0.0]); 3];
        let labels = vec![Label::Adopted, Label::NotAdopted];
        assert!(LogisticRegression::fit(&rows, &labels, 1, &LogisticRegressionConfig::default())
            .is_err());
    }
}
