//! The frozen classifier artifact and its on-disk form.
//!
//! An artifact bundles the fitted TF-IDF vectorizer, the trained regression
//! model, and the ordered label set into one immutable unit. It is created
//! only by the trainer, replaced wholesale on retrain, and read-only for every
//! consumer after load. Persistence is bincode with an atomic temp-file +
//! rename protocol, so a failed write never corrupts a previously valid
//! artifact at the serving path.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::features::TfIdfVectorizer;
use crate::model::logistic::LogisticRegression;

/// Provenance information recorded at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// When the artifact was produced.
    pub trained_at: DateTime<Utc>,
    /// Number of training-split samples the model was fit on.
    pub train_size: usize,
    /// Number of held-out samples used for evaluation.
    pub test_size: usize,
}

/// Frozen (vectorizer, classifier, label set) triple.
///
/// `labels` is the unique template ids in ascending order; position `i` of
/// every probability vector corresponds to `labels[i]`. The ordering is part
/// of the tie-break contract and must never change after training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub(crate) vectorizer: TfIdfVectorizer,
    pub(crate) model: LogisticRegression,
    pub(crate) labels: Vec<i64>,
    pub metadata: ArtifactMetadata,
}

impl ClassifierArtifact {
    /// Unique template ids in ascending order.
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Probability distribution over [`ClassifierArtifact::labels`] for `text`.
    pub fn probabilities(&self, text: &str) -> Vec<f64> {
        let features = self.vectorizer.transform(text);
        self.model.predict_proba(&features)
    }

    /// Serialize the artifact to `path`, creating parent directories.
    ///
    /// The write goes to a sibling temp file first and is renamed into place,
    /// so the serving path always holds either the old or the new artifact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        write_atomic(path.as_ref(), &bytes)
    }

    /// Deserialize an artifact previously written by [`ClassifierArtifact::save`].
    ///
    /// The loaded artifact produces bit-for-bit identical probabilities to the
    /// in-memory original.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

/// Write `bytes` to `path` atomically: temp file in the same directory, then
/// rename. Creates missing parent directories.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    temp_name.push_str(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
