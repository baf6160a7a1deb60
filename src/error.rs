//! Error types for the plantilla library.
//!
//! All fatal failures are represented by the [`PlantillaError`] enum. Degraded
//! prediction outcomes (missing artifact, blank text, below-threshold score)
//! are **not** errors: they surface as empty [`Option`] values from the
//! prediction service and must be handled as ordinary results.
//!
//! # Examples
//!
//! ```
//! use plantilla::error::{PlantillaError, Result};
//!
//! fn check(labels: usize) -> Result<()> {
//!     if labels < 2 {
//!         return Err(PlantillaError::validation("need at least two templates"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(1).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for plantilla operations.
#[derive(Error, Debug)]
pub enum PlantillaError {
    /// Dataset shape violations: too few distinct templates, blank text, etc.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Numerical fitting failures (degenerate feature space, empty vocabulary).
    #[error("Training error: {0}")]
    Training(String),

    /// I/O errors (reading datasets, writing artifacts or metrics).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact encoding/decoding errors.
    #[error("Artifact error: {0}")]
    Artifact(#[from] bincode::Error),
}

/// Result type alias for operations that may fail with [`PlantillaError`].
pub type Result<T> = std::result::Result<T, PlantillaError>;

impl PlantillaError {
    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        PlantillaError::Validation(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        PlantillaError::Training(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = PlantillaError::validation("fewer than two templates");
        assert_eq!(
            error.to_string(),
            "Validation error: fewer than two templates"
        );

        let error = PlantillaError::training("empty vocabulary");
        assert_eq!(error.to_string(), "Training error: empty vocabulary");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "no dataset");
        let error = PlantillaError::from(io_error);

        match error {
            PlantillaError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
