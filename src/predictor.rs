//! Online prediction service.
//!
//! [`Predictor`] is an explicit handle around one loaded artifact. Construct
//! it once per process and pass it by reference; there is no hidden global
//! state. Scoring is pure and read-only, so a `Predictor` shared between
//! threads needs no synchronization.
//!
//! Abstention is a first-class outcome, never an error: a missing artifact,
//! blank text, an empty eligible candidate set, or a best score below the
//! threshold all yield `None`, and callers are expected to fall back to an
//! alternate classification strategy.

use std::collections::HashSet;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::ClassifierArtifact;

/// Default minimum accepted confidence score.
pub const DEFAULT_THRESHOLD: f64 = 0.35;

/// One scoring request.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    /// Raw extracted document text.
    pub text: String,
    /// Optional candidate restriction. When present and non-empty, only these
    /// template ids are eligible; unknown ids are silently dropped.
    pub candidate_template_ids: Option<HashSet<i64>>,
    /// Minimum accepted score. A score exactly equal to the threshold is
    /// accepted; only strictly smaller scores abstain.
    pub threshold: f64,
}

impl PredictionRequest {
    /// Request with no candidate restriction and the default threshold.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            candidate_template_ids: None,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// A confident match: the winning template and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub template_id: i64,
    pub score: f64,
}

/// Prediction handle around one immutable [`ClassifierArtifact`].
#[derive(Debug)]
pub struct Predictor {
    artifact: ClassifierArtifact,
}

impl Predictor {
    /// Wrap an already loaded artifact.
    pub fn new(artifact: ClassifierArtifact) -> Self {
        Self { artifact }
    }

    /// Load an artifact from `path`.
    ///
    /// A missing artifact is a normal degraded state, not an error: it yields
    /// `Ok(None)`. An unreadable or corrupt artifact is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::new(ClassifierArtifact::load(path)?)))
    }

    /// The underlying artifact.
    pub fn artifact(&self) -> &ClassifierArtifact {
        &self.artifact
    }

    /// Score `request.text` against the eligible template set.
    ///
    /// Returns `None` for blank text, an empty eligible set, or a winning
    /// probability strictly below the threshold. Ties on the maximum score go
    /// to the earliest label in ascending order (strict `>` during the scan).
    pub fn predict(&self, request: &PredictionRequest) -> Option<Prediction> {
        if request.text.trim().is_empty() {
            return None;
        }

        let labels = self.artifact.labels();
        let eligible = self.eligible_mask(request.candidate_template_ids.as_ref());
        if !eligible.iter().any(|&e| e) {
            return None;
        }

        let probs = self.artifact.probabilities(&request.text);

        let mut best: Option<usize> = None;
        for (i, &p) in probs.iter().enumerate() {
            if !eligible[i] {
                continue;
            }
            match best {
                Some(b) if p > probs[b] => best = Some(i),
                None => best = Some(i),
                _ => {}
            }
        }

        let best = best?;
        if probs[best] < request.threshold {
            return None;
        }

        Some(Prediction {
            template_id: labels[best],
            score: probs[best],
        })
    }

    /// Per-label eligibility under an optional candidate restriction.
    fn eligible_mask(&self, candidates: Option<&HashSet<i64>>) -> Vec<bool> {
        let labels = self.artifact.labels();
        match candidates {
            Some(set) if !set.is_empty() => {
                let unknown: Vec<i64> = set
                    .iter()
                    .filter(|&&id| !labels.contains(&id))
                    .copied()
                    .collect();
                if !unknown.is_empty() {
                    warn!("dropping unknown candidate template ids: {unknown:?}");
                }
                labels.iter().map(|l| set.contains(l)).collect()
            }
            _ => vec![true; labels.len()],
        }
    }
}
