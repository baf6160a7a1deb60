//! TF-IDF feature extraction.
//!
//! [`TfIdfVectorizer`] turns document text into fixed-dimensional numeric
//! vectors. It is fit exactly once, on the training split only; the test
//! split and all future inference text are transformed through the frozen
//! vocabulary. Tokens unseen during fit are ignored at transform time.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::analyze;
use crate::error::{PlantillaError, Result};

/// TF-IDF vectorizer with a frozen vocabulary.
///
/// Vocabulary indices are assigned in first-seen token order over the fitting
/// corpus, so identical training data always yields an identical feature
/// layout. Output vectors are L2-normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Vocabulary: term -> vector index.
    vocabulary: HashMap<String, usize>,
    /// Smoothed inverse document frequency per vector index.
    idf: Vec<f64>,
    /// Number of documents seen during fit.
    n_documents: usize,
}

impl TfIdfVectorizer {
    /// Fit a vectorizer on a training corpus.
    ///
    /// Fails with a training error when the corpus produces an empty
    /// vocabulary (no tokenizable text at all).
    pub fn fit(documents: &[&str]) -> Result<Self> {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc in documents {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in analyze(doc) {
                let next_index = vocabulary.len();
                let index = *vocabulary.entry(token).or_insert(next_index);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                if seen.insert(index) {
                    document_frequency[index] += 1;
                }
            }
        }

        if vocabulary.is_empty() {
            return Err(PlantillaError::training(
                "empty vocabulary: training corpus has no tokenizable text",
            ));
        }

        // Smoothed IDF: ln((N + 1) / (df + 1)) + 1
        let n_documents = documents.len();
        let idf = document_frequency
            .iter()
            .map(|&df| ((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0)
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            n_documents,
        })
    }

    /// Transform a document into an L2-normalized TF-IDF vector.
    ///
    /// The output length always equals [`TfIdfVectorizer::dimension`]; text
    /// with no known tokens maps to the zero vector.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let tokens = analyze(document);
        let mut tf = vec![0.0; self.idf.len()];

        for token in &tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                tf[index] += 1.0;
            }
        }

        let token_count = tokens.len() as f64;
        if token_count > 0.0 {
            for value in &mut tf {
                *value /= token_count;
            }
        }

        for (value, idf) in tf.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm: f64 = tf.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut tf {
                *value /= norm;
            }
        }

        tf
    }

    /// Feature dimensionality (vocabulary size).
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Number of documents the vectorizer was fit on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}
