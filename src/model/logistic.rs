//! Multinomial logistic regression.
//!
//! A softmax classifier trained by deterministic full-batch gradient descent:
//! weights start at zero and the iteration count is fixed, so identical
//! training data always produces identical parameters. Classes are label
//! *indices* here; mapping indices to template ids is the artifact's job.

use serde::{Deserialize, Serialize};

use crate::error::{PlantillaError, Result};

/// Hyperparameters for [`LogisticRegression::fit`].
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Fixed number of full-batch iterations.
    pub iterations: usize,
    /// L2 regularization strength.
    pub l2: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1.0,
            iterations: 300,
            l2: 1e-4,
        }
    }
}

/// A trained multinomial (softmax) logistic regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Weight matrix, row-major `n_classes x n_features`.
    weights: Vec<f64>,
    /// Per-class bias terms.
    bias: Vec<f64>,
    n_features: usize,
    n_classes: usize,
}

impl LogisticRegression {
    /// Fit a model on feature vectors `x` with class indices `y`.
    ///
    /// `y[i]` must be in `0..n_classes`. Fails with a training error on a
    /// degenerate problem (no samples, zero-width features, fewer than two
    /// classes).
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, config: &FitConfig) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(PlantillaError::training(format!(
                "inconsistent training set: {} feature rows, {} labels",
                x.len(),
                y.len()
            )));
        }
        if n_classes < 2 {
            return Err(PlantillaError::training(format!(
                "need at least 2 classes, got {n_classes}"
            )));
        }
        let n_features = x[0].len();
        if n_features == 0 {
            return Err(PlantillaError::training("zero-width feature vectors"));
        }
        if let Some(&bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(PlantillaError::training(format!(
                "class index {bad} out of range for {n_classes} classes"
            )));
        }

        let mut model = Self {
            weights: vec![0.0; n_classes * n_features],
            bias: vec![0.0; n_classes],
            n_features,
            n_classes,
        };

        let n_samples = x.len() as f64;
        let mut grad_w = vec![0.0; n_classes * n_features];
        let mut grad_b = vec![0.0; n_classes];

        for _ in 0..config.iterations {
            grad_w.fill(0.0);
            grad_b.fill(0.0);

            for (features, &class) in x.iter().zip(y) {
                let probs = model.predict_proba(features);
                for c in 0..n_classes {
                    let delta = probs[c] - if c == class { 1.0 } else { 0.0 };
                    grad_b[c] += delta;
                    let row = &mut grad_w[c * n_features..(c + 1) * n_features];
                    for (g, &v) in row.iter_mut().zip(features) {
                        *g += delta * v;
                    }
                }
            }

            for c in 0..n_classes {
                model.bias[c] -= config.learning_rate * grad_b[c] / n_samples;
                let row = c * n_features;
                for j in 0..n_features {
                    let grad =
                        grad_w[row + j] / n_samples + config.l2 * model.weights[row + j];
                    model.weights[row + j] -= config.learning_rate * grad;
                }
            }
        }

        Ok(model)
    }

    /// Probability distribution over all classes for one feature vector.
    ///
    /// Output has length `n_classes` and sums to 1 (softmax with max
    /// subtraction for numerical stability).
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut logits = Vec::with_capacity(self.n_classes);
        for c in 0..self.n_classes {
            let row = &self.weights[c * self.n_features..(c + 1) * self.n_features];
            let dot: f64 = row.iter().zip(features).map(|(w, v)| w * v).sum();
            logits.push(dot + self.bias[c]);
        }

        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut probs: Vec<f64> = logits.iter().map(|&l| (l - max).exp()).collect();
        let sum: f64 = probs.iter().sum();
        for p in &mut probs {
            *p /= sum;
        }
        probs
    }

    /// Number of classes this model discriminates.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Expected feature dimensionality.
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
