//! # plantilla
//!
//! A tenant-aware document template classifier.
//!
//! ## Features
//!
//! - TF-IDF features over a fixed Unicode tokenization policy
//! - Multinomial logistic regression with deterministic training
//! - Seeded stratified train/test splitting
//! - Global, per-class, and per-tenant evaluation metrics
//! - Atomic single-file artifact persistence
//! - Thresholded prediction with candidate restriction and deterministic
//!   tie-breaking
//!
//! Training is an offline batch that replaces the artifact wholesale;
//! prediction is a pure, read-only scoring call over the loaded artifact.

pub mod analysis;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod features;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod split;
pub mod trainer;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
