//! Logistic Regression for binary classification
//!
//! Full-batch gradient descent on the mean log loss over sparse TF-IDF rows.
//! Training is deterministic: weights start at zero and every iteration
//! sees the whole training set in order.

use crate::nlp::SparseVector;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors for logistic regression
#[derive(Error, Debug)]
pub enum LogisticRegressionError {
    #[error("Model has not been fitted yet")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Feature index {index} out of range for {n_features} features")]
    FeatureOutOfRange { index: usize, n_features: usize },

    #[error("Cannot fit on an empty training set")]
    EmptyInput,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Regularization type for logistic regression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Regularization {
    /// No regularization
    None,
    /// L2 regularization (Ridge)
    L2(f64),
}

/// Logistic Regression classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients, one per feature column
    pub coefficients: Option<Array1<f64>>,
    /// Intercept term
    pub intercept: Option<f64>,
    learning_rate: f64,
    max_iter: usize,
    /// Stop when the cost changes less than this between iterations
    tolerance: f64,
    fit_intercept: bool,
    regularization: Regularization,
    /// Cost per iteration of the last fit
    pub cost_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(2.0, 1000, 1e-7, true, Regularization::L2(1e-4))
    }
}

impl LogisticRegression {
    pub fn new(
        learning_rate: f64,
        max_iter: usize,
        tolerance: f64,
        fit_intercept: bool,
        regularization: Regularization,
    ) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            learning_rate,
            max_iter,
            tolerance,
            fit_intercept,
            regularization,
            cost_history: Vec::new(),
        }
    }

    /// Numerically stable sigmoid
    pub fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    fn linear(row: &SparseVector, weights: &Array1<f64>, bias: f64) -> f64 {
        row.iter()
            .filter_map(|(i, v)| weights.get(i).map(|w| w * v))
            .sum::<f64>()
            + bias
    }

    /// Binary cross-entropy
    fn log_loss(y_true: &[f64], y_pred: &[f64]) -> f64 {
        let eps = 1e-15;
        let n = y_true.len() as f64;

        -y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p_clipped = p.clamp(eps, 1.0 - eps);
                y * p_clipped.ln() + (1.0 - y) * (1.0 - p_clipped).ln()
            })
            .sum::<f64>()
            / n
    }

    fn validate(&self) -> Result<(), LogisticRegressionError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(LogisticRegressionError::InvalidParameter(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        let strength = match self.regularization {
            Regularization::None => 0.0,
            Regularization::L2(alpha) => alpha,
        };
        if strength < 0.0 || !strength.is_finite() {
            return Err(LogisticRegressionError::InvalidParameter(format!(
                "regularization strength must be a non-negative number, got {}",
                strength
            )));
        }
        Ok(())
    }

    /// Fit using gradient descent.
    ///
    /// `y` holds 0.0 / 1.0 targets aligned with the rows of `x`.
    pub fn fit(
        &mut self,
        x: &[SparseVector],
        y: &[f64],
        n_features: usize,
    ) -> Result<(), LogisticRegressionError> {
        self.validate()?;

        if x.is_empty() {
            return Err(LogisticRegressionError::EmptyInput);
        }
        if x.len() != y.len() {
            return Err(LogisticRegressionError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        if let Some(index) = x.iter().flat_map(|row| row.indices.iter()).find(|&&i| i >= n_features)
        {
            return Err(LogisticRegressionError::FeatureOutOfRange {
                index: *index,
                n_features,
            });
        }

        let n_samples = x.len() as f64;
        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;
        let mut predictions = vec![0.0; x.len()];

        self.cost_history.clear();

        for iter in 0..self.max_iter {
            // Forward pass
            for (p, row) in predictions.iter_mut().zip(x) {
                *p = Self::sigmoid(Self::linear(row, &weights, bias));
            }

            // Gradients
            let mut dw = Array1::<f64>::zeros(n_features);
            let mut db = 0.0;
            for ((row, &p), &target) in x.iter().zip(predictions.iter()).zip(y) {
                let error = p - target;
                for (i, v) in row.iter() {
                    dw[i] += error * v;
                }
                db += error;
            }
            dw /= n_samples;
            db /= n_samples;

            match self.regularization {
                Regularization::L2(alpha) => {
                    dw.scaled_add(alpha, &weights);
                }
                Regularization::None => {}
            }

            weights.scaled_add(-self.learning_rate, &dw);
            if self.fit_intercept {
                bias -= self.learning_rate * db;
            }

            let cost = Self::log_loss(y, &predictions);
            self.cost_history.push(cost);

            if iter > 0 {
                let cost_diff = (self.cost_history[iter - 1] - cost).abs();
                if cost_diff < self.tolerance {
                    debug!(iteration = iter, cost, "logistic regression converged");
                    break;
                }
            }
        }

        debug!(
            iterations = self.cost_history.len(),
            final_cost = self.cost_history.last().copied().unwrap_or_default(),
            "logistic regression fitted"
        );

        self.coefficients = Some(weights);
        self.intercept = Some(bias);

        Ok(())
    }

    fn fitted(&self) -> Result<(&Array1<f64>, f64), LogisticRegressionError> {
        let weights = self
            .coefficients
            .as_ref()
            .ok_or(LogisticRegressionError::NotFitted)?;
        let bias = self.intercept.ok_or(LogisticRegressionError::NotFitted)?;
        Ok((weights, bias))
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some() && self.intercept.is_some()
    }

    /// Number of feature columns the model was fitted on
    pub fn n_features(&self) -> Option<usize> {
        self.coefficients.as_ref().map(|c| c.len())
    }

    /// Log-odds for each row
    pub fn decision_function(
        &self,
        x: &[SparseVector],
    ) -> Result<Array1<f64>, LogisticRegressionError> {
        let (weights, bias) = self.fitted()?;
        Ok(x.iter().map(|row| Self::linear(row, weights, bias)).collect())
    }

    /// Probability of the positive class for each row
    pub fn predict_proba(
        &self,
        x: &[SparseVector],
    ) -> Result<Array1<f64>, LogisticRegressionError> {
        Ok(self.decision_function(x)?.mapv(Self::sigmoid))
    }

    /// Probability of the positive class for one row
    pub fn predict_proba_one(&self, row: &SparseVector) -> Result<f64, LogisticRegressionError> {
        let (weights, bias) = self.fitted()?;
        Ok(Self::sigmoid(Self::linear(row, weights, bias)))
    }

    /// Predict class labels (0 or 1)
    pub fn predict(&self, x: &[SparseVector]) -> Result<Array1<f64>, LogisticRegressionError> {
        self.predict_with_threshold(x, 0.5)
    }

    pub fn predict_with_threshold(
        &self,
        x: &[SparseVector],
        threshold: f64,
    ) -> Result<Array1<f64>, LogisticRegressionError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= threshold { 1.0 } else { 0.0 }))
    }

    /// Strongest coefficients in each direction: (most positive, most negative)
    pub fn top_coefficients(
        &self,
        feature_names: &[String],
        n: usize,
    ) -> Result<(Vec<(String, f64)>, Vec<(String, f64)>), LogisticRegressionError> {
        let (weights, _) = self.fitted()?;
        if feature_names.len() != weights.len() {
            return Err(LogisticRegressionError::DimensionMismatch {
                expected: weights.len(),
                got: feature_names.len(),
            });
        }

        let mut pairs: Vec<(String, f64)> = feature_names
            .iter()
            .cloned()
            .zip(weights.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let positive = pairs.iter().filter(|(_, c)| *c > 0.0).take(n).cloned().collect();
        let negative = pairs
            .iter()
            .rev()
            .filter(|(_, c)| *c < 0.0)
            .take(n)
            .cloned()
            .collect();

        Ok((positive, negative))
    }

    /// Model summary
    pub fn summary(&self, feature_names: Option<&[String]>) -> String {
        let mut s = String::new();
        s.push_str("Logistic Regression Summary\n");
        s.push_str("===========================\n\n");

        let Some(coef) = self.coefficients.as_ref() else {
            s.push_str("Model not fitted yet.\n");
            return s;
        };

        s.push_str(&format!(
            "Intercept: {:.6}\nFeatures:  {}\nIterations: {}\n",
            self.intercept.unwrap_or(0.0),
            coef.len(),
            self.cost_history.len()
        ));

        if let Some(names) = feature_names {
            if let Ok((positive, negative)) = self.top_coefficients(names, 10) {
                s.push_str("\nMost positive terms (log-odds):\n");
                for (name, c) in positive {
                    s.push_str(&format!("  {:20}: {:>10.6} (OR: {:.4})\n", name, c, c.exp()));
                }
                s.push_str("\nMost negative terms (log-odds):\n");
                for (name, c) in negative {
                    s.push_str(&format!("  {:20}: {:>10.6} (OR: {:.4})\n", name, c, c.exp()));
                }
            }
        }

        s.push_str(&format!(
            "\nFinal cost: {:.6}\n",
            self.cost_history.last().unwrap_or(&0.0)
        ));

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn dense_rows(rows: &[[f64; 2]]) -> Vec<SparseVector> {
        rows.iter()
            .map(|r| {
                let map: BTreeMap<usize, f64> = r.iter().copied().enumerate().collect();
                SparseVector::from_map(map)
            })
            .collect()
    }

    fn separable() -> (Vec<SparseVector>, Vec<f64>) {
        let x = dense_rows(&[
            [0.0, 0.0],
            [0.5, 0.5],
            [1.0, 1.0],
            [5.0, 5.0],
            [5.5, 5.5],
            [6.0, 6.0],
        ]);
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_sigmoid() {
        assert!((LogisticRegression::sigmoid(0.0) - 0.5).abs() < 1e-10);
        assert!(LogisticRegression::sigmoid(100.0) > 0.99);
        assert!(LogisticRegression::sigmoid(-100.0) < 0.01);
        assert!(LogisticRegression::sigmoid(-1000.0).is_finite());
    }

    #[test]
    fn test_logistic_regression_fit() {
        let (x, y) = separable();

        let mut model = LogisticRegression::new(0.1, 2000, 1e-9, true, Regularization::None);
        model.fit(&x, &y, 2).unwrap();

        let predictions = model.predict(&x).unwrap();
        let accuracy = predictions
            .iter()
            .zip(y.iter())
            .filter(|(&p, &a)| (p - a).abs() < 0.5)
            .count() as f64
            / y.len() as f64;

        assert!(accuracy >= 0.8);
        assert!(model.cost_history.first().unwrap() > model.cost_history.last().unwrap());
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = separable();

        let mut a = LogisticRegression::new(0.1, 300, 0.0, true, Regularization::L2(0.01));
        let mut b = a.clone();
        a.fit(&x, &y, 2).unwrap();
        b.fit(&x, &y, 2).unwrap();

        assert_eq!(a.coefficients, b.coefficients);
        assert_eq!(a.intercept, b.intercept);
    }

    #[test]
    fn test_l2_shrinks_coefficients() {
        let (x, y) = separable();

        let mut free = LogisticRegression::new(0.1, 500, 0.0, true, Regularization::None);
        let mut ridge = LogisticRegression::new(0.1, 500, 0.0, true, Regularization::L2(1.0));
        free.fit(&x, &y, 2).unwrap();
        ridge.fit(&x, &y, 2).unwrap();

        let norm = |m: &LogisticRegression| {
            m.coefficients
                .as_ref()
                .unwrap()
                .iter()
                .map(|c| c * c)
                .sum::<f64>()
                .sqrt()
        };
        assert!(norm(&ridge) < norm(&free));
    }

    #[test]
    fn test_not_fitted() {
        let model = LogisticRegression::default();
        let rows = dense_rows(&[[1.0, 0.0]]);
        assert!(matches!(
            model.predict_proba(&rows),
            Err(LogisticRegressionError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let mut model = LogisticRegression::default();
        assert!(matches!(
            model.fit(&[], &[], 2),
            Err(LogisticRegressionError::EmptyInput)
        ));

        let rows = dense_rows(&[[1.0, 1.0]]);
        assert!(matches!(
            model.fit(&rows, &[1.0, 0.0], 2),
            Err(LogisticRegressionError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            model.fit(&rows, &[1.0], 1),
            Err(LogisticRegressionError::FeatureOutOfRange { .. })
        ));

        let mut bad_rate = LogisticRegression::new(0.0, 10, 1e-6, true, Regularization::None);
        assert!(matches!(
            bad_rate.fit(&rows, &[1.0], 2),
            Err(LogisticRegressionError::InvalidParameter(_))
        ));

        let mut infinite_rate =
            LogisticRegression::new(f64::INFINITY, 10, 1e-6, true, Regularization::None);
        assert!(matches!(
            infinite_rate.fit(&rows, &[1.0], 2),
            Err(LogisticRegressionError::InvalidParameter(_))
        ));
        assert!(!infinite_rate.is_fitted());
    }

    #[test]
    fn test_top_coefficients() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(0.1, 500, 0.0, false, Regularization::None);
        model.fit(&x, &y, 2).unwrap();

        let names = vec!["a".to_string(), "b".to_string()];
        let (positive, negative) = model.top_coefficients(&names, 5).unwrap();
        assert!(positive.len() + negative.len() <= 2);
        assert!(model.summary(Some(&names)).contains("Intercept"));
    }
}
