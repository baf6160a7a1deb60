//! Offline training pipeline.
//!
//! One-shot batch: validate the dataset, split it, fit the vectorizer on the
//! training split only, fit the regression model, evaluate on the held-out
//! split, and hand back the frozen artifact plus metrics. Retraining replaces
//! the artifact wholesale; there is no incremental path.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use log::{debug, info};

use crate::dataset::{Sample, validate_samples};
use crate::error::Result;
use crate::features::TfIdfVectorizer;
use crate::metrics::{Metrics, compute_metrics};
use crate::model::logistic::{FitConfig, LogisticRegression};
use crate::model::{ArtifactMetadata, ClassifierArtifact};
use crate::split::{DEFAULT_SEED, DEFAULT_TEST_FRACTION, stratified_split};

/// Configuration for one training run.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Held-out test fraction (default 0.2).
    pub test_fraction: f64,
    /// Split seed (fixed by default for reproducible partitions).
    pub seed: u64,
    /// Regression hyperparameters.
    pub fit: FitConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            fit: FitConfig::default(),
        }
    }
}

/// Result of one training run.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub artifact: ClassifierArtifact,
    pub metrics: Metrics,
}

/// Run the full training pipeline over `samples`.
///
/// Fails with a validation error on a malformed dataset and a training error
/// on a degenerate feature space. On success the returned artifact is frozen:
/// nothing downstream mutates it.
pub fn train(samples: &[Sample], config: &TrainerConfig) -> Result<TrainingOutcome> {
    validate_samples(samples)?;

    let split = stratified_split(samples, config.test_fraction, config.seed);
    debug!(
        "stratified split: {} train / {} test (fraction {}, seed {})",
        split.train.len(),
        split.test.len(),
        config.test_fraction,
        config.seed
    );

    // Ascending unique label set; probability vectors are aligned to it.
    let labels: Vec<i64> = samples
        .iter()
        .map(|s| s.template_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let label_index: HashMap<i64, usize> =
        labels.iter().enumerate().map(|(i, &l)| (l, i)).collect();

    // The vectorizer sees the training split only; the test split is
    // transformed through the frozen vocabulary to keep evaluation honest.
    let train_texts: Vec<&str> = split.train.iter().map(|&i| samples[i].text.as_str()).collect();
    let vectorizer = TfIdfVectorizer::fit(&train_texts)?;
    info!(
        "fit vectorizer on {} documents, {} terms",
        train_texts.len(),
        vectorizer.dimension()
    );

    let train_features: Vec<Vec<f64>> = split
        .train
        .iter()
        .map(|&i| vectorizer.transform(&samples[i].text))
        .collect();
    let train_labels: Vec<usize> = split
        .train
        .iter()
        .map(|&i| label_index[&samples[i].template_id])
        .collect();

    let model = LogisticRegression::fit(&train_features, &train_labels, labels.len(), &config.fit)?;

    // Held-out predictions for the metrics aggregator. Ties resolve to the
    // earliest label in ascending order via the strict `>` scan.
    let predicted: Vec<i64> = split
        .test
        .iter()
        .map(|&i| {
            let probs = model.predict_proba(&vectorizer.transform(&samples[i].text));
            let mut best = 0;
            for (c, &p) in probs.iter().enumerate() {
                if p > probs[best] {
                    best = c;
                }
            }
            labels[best]
        })
        .collect();

    let metrics = compute_metrics(samples, &split, &predicted);
    info!(
        "trained on {} samples, accuracy {:.4} over {} held-out samples",
        split.train.len(),
        metrics.accuracy,
        split.test.len()
    );

    let artifact = ClassifierArtifact {
        vectorizer,
        model,
        labels,
        metadata: ArtifactMetadata {
            trained_at: Utc::now(),
            train_size: split.train.len(),
            test_size: split.test.len(),
        },
    };

    Ok(TrainingOutcome { artifact, metrics })
}
