//! Command implementations for the plantilla CLI.
//!
//! Library errors are composed into `anyhow` here so fatal messages name the
//! file the command was working on, not just the underlying failure.

use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::cli::args::*;
use crate::dataset::load_samples;
use crate::model::write_atomic;
use crate::predictor::{PredictionRequest, Predictor};
use crate::trainer::{TrainerConfig, train};

/// Execute a CLI command.
pub fn execute_command(args: PlantillaArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => run_train(train_args.clone(), &args),
        Command::Predict(predict_args) => run_predict(predict_args.clone(), &args),
    }
}

/// Train a classifier and write the artifact and metrics files.
///
/// Any validation, IO, or training failure aborts before anything is written;
/// both output files are replaced atomically on success.
fn run_train(args: TrainArgs, cli_args: &PlantillaArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!("Training from: {}", args.dataset.display());
    }

    let samples = load_samples(&args.dataset)
        .with_context(|| format!("cannot load dataset {}", args.dataset.display()))?;
    let config = TrainerConfig {
        test_fraction: args.test_size,
        ..TrainerConfig::default()
    };
    let outcome = train(&samples, &config)?;

    outcome
        .artifact
        .save(&args.artifact)
        .with_context(|| format!("cannot write artifact {}", args.artifact.display()))?;
    let metrics_json = serde_json::to_string_pretty(&outcome.metrics)?;
    write_atomic(&args.metrics, metrics_json.as_bytes())
        .with_context(|| format!("cannot write metrics {}", args.metrics.display()))?;

    if cli_args.verbosity() > 0 {
        println!(
            "Trained {} templates on {} samples, accuracy {:.4}",
            outcome.artifact.labels().len(),
            outcome.metrics.train_size,
            outcome.metrics.accuracy
        );
        println!("Artifact written to: {}", args.artifact.display());
        println!("Metrics written to: {}", args.metrics.display());
    }

    Ok(())
}

/// Score text against an artifact, printing exactly one JSON object.
///
/// Absence of a confident prediction is a normal outcome: a missing artifact,
/// blank text, or a below-threshold score all print `{}` and succeed.
fn run_predict(args: PredictArgs, _cli_args: &PlantillaArgs) -> Result<()> {
    let predictor = Predictor::open(&args.artifact)
        .with_context(|| format!("cannot read artifact {}", args.artifact.display()))?;
    let prediction = match predictor {
        Some(predictor) => {
            let candidates: HashSet<i64> = args.candidates.iter().copied().collect();
            let request = PredictionRequest {
                text: args.text,
                candidate_template_ids: (!candidates.is_empty()).then_some(candidates),
                threshold: args.threshold,
            };
            predictor.predict(&request)
        }
        None => None,
    };

    match prediction {
        Some(prediction) => println!("{}", serde_json::to_string(&prediction)?),
        None => println!("{{}}"),
    }

    Ok(())
}
