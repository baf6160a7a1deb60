//! Command line argument parsing for the plantilla CLI using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::predictor::DEFAULT_THRESHOLD;
use crate::split::DEFAULT_TEST_FRACTION;

/// plantilla - tenant-aware document template classifier
#[derive(Parser, Debug, Clone)]
#[command(name = "plantilla")]
#[command(about = "Train and query a tenant-aware document template classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PlantillaArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PlantillaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a classifier from a labeled dataset
    Train(TrainArgs),

    /// Score text against a trained artifact
    Predict(PredictArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Dataset file path (JSON array of samples)
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Output path for the trained artifact
    #[arg(short, long, value_name = "PATH")]
    pub artifact: PathBuf,

    /// Output path for the metrics JSON
    #[arg(short, long, value_name = "PATH")]
    pub metrics: PathBuf,

    /// Held-out test fraction
    #[arg(long, value_name = "FRACTION", default_value_t = DEFAULT_TEST_FRACTION)]
    pub test_size: f64,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Path to the trained artifact
    #[arg(value_name = "ARTIFACT")]
    pub artifact: PathBuf,

    /// Raw document text to classify
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Restrict prediction to these template ids (repeatable)
    #[arg(short, long = "candidate", value_name = "ID")]
    pub candidates: Vec<i64>,

    /// Minimum accepted confidence score
    #[arg(short, long, value_name = "SCORE", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_command() {
        let args = PlantillaArgs::parse_from([
            "plantilla",
            "train",
            "dataset.json",
            "--artifact",
            "model.bin",
            "--metrics",
            "metrics.json",
        ]);
        match args.command {
            Command::Train(train) => {
                assert_eq!(train.dataset, PathBuf::from("dataset.json"));
                assert_eq!(train.test_size, DEFAULT_TEST_FRACTION);
            }
            _ => panic!("expected train command"),
        }
    }

    #[test]
    fn test_parse_predict_with_repeated_candidates() {
        let args = PlantillaArgs::parse_from([
            "plantilla",
            "predict",
            "model.bin",
            "FACTURA A nueva",
            "--candidate",
            "1",
            "--candidate",
            "2",
            "--threshold",
            "0.3",
        ]);
        match args.command {
            Command::Predict(predict) => {
                assert_eq!(predict.candidates, vec![1, 2]);
                assert_eq!(predict.threshold, 0.3);
            }
            _ => panic!("expected predict command"),
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = PlantillaArgs::parse_from(["plantilla", "-q", "predict", "m.bin", "x"]);
        assert_eq!(args.verbosity(), 0);

        let args = PlantillaArgs::parse_from(["plantilla", "-vv", "predict", "m.bin", "x"]);
        assert_eq!(args.verbosity(), 2);
    }
}
