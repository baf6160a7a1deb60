//! Classifier model: softmax regression and the persisted artifact.

pub mod artifact;
pub mod logistic;

pub use artifact::{ArtifactMetadata, ClassifierArtifact, write_atomic};
pub use logistic::{FitConfig, LogisticRegression};
