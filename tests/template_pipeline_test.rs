use std::collections::HashSet;

use plantilla::dataset::Sample;
use plantilla::error::Result;
use plantilla::model::ClassifierArtifact;
use plantilla::predictor::{PredictionRequest, Predictor};
use plantilla::trainer::{TrainerConfig, train};
use tempfile::TempDir;

fn sample(text: &str, template_id: i64, org: Option<i64>, comp: Option<i64>) -> Sample {
    Sample {
        text: text.to_string(),
        template_id,
        organization_id: org,
        company_id: comp,
    }
}

fn spec_example_dataset() -> Vec<Sample> {
    vec![
        sample("FACTURA A", 1, None, None),
        sample("FACTURA A v2", 1, None, None),
        sample("BOLETA B", 2, None, None),
        sample("BOLETA B v2", 2, None, None),
    ]
}

fn tenant_dataset() -> Vec<Sample> {
    let mut samples = Vec::new();
    for i in 0..8 {
        samples.push(sample(
            &format!("FACTURA ELECTRONICA serie F{i:03}"),
            1,
            Some(1),
            Some(10),
        ));
        samples.push(sample(
            &format!("BOLETA DE VENTA serie B{i:03}"),
            2,
            Some(2),
            None,
        ));
    }
    // A tenant too small to reach the test split.
    samples.push(sample("FACTURA ELECTRONICA serie FX", 1, Some(9), Some(90)));
    samples
}

#[test]
fn test_end_to_end_spec_example() -> Result<()> {
    // 1. Train on the minimal two-template dataset.
    let outcome = train(&spec_example_dataset(), &TrainerConfig::default())?;

    // 2. Persist and reload through the artifact file.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template-classifier.bin");
    outcome.artifact.save(&path)?;

    let predictor = Predictor::open(&path)?.expect("artifact should exist");

    // 3. A new FACTURA variant restricted to the known candidates.
    let request = PredictionRequest {
        text: "FACTURA A nueva".to_string(),
        candidate_template_ids: Some([1, 2].into_iter().collect()),
        threshold: 0.3,
    };
    let prediction = predictor.predict(&request).expect("confident match");
    assert_eq!(prediction.template_id, 1);
    assert!(prediction.score > 0.3);

    Ok(())
}

#[test]
fn test_persisted_artifact_scores_bit_identically() -> Result<()> {
    let outcome = train(&tenant_dataset(), &TrainerConfig::default())?;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("models").join("template-classifier.bin");
    outcome.artifact.save(&path)?;
    let loaded = ClassifierArtifact::load(&path)?;

    let text = "BOLETA DE VENTA serie B999";
    assert_eq!(
        outcome.artifact.probabilities(text),
        loaded.probabilities(text)
    );
    Ok(())
}

#[test]
fn test_probabilities_form_a_simplex() -> Result<()> {
    let outcome = train(&tenant_dataset(), &TrainerConfig::default())?;

    for text in ["FACTURA nueva", "texto sin relacion alguna", "BOLETA"] {
        let probs = outcome.artifact.probabilities(text);
        assert_eq!(probs.len(), outcome.artifact.labels().len());
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "probabilities must sum to 1");
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }
    Ok(())
}

#[test]
fn test_metrics_cover_tenants_and_classes() -> Result<()> {
    let outcome = train(&tenant_dataset(), &TrainerConfig::default())?;
    let metrics = outcome.metrics;

    assert_eq!(metrics.train_size + metrics.test_size, 17);
    assert!(metrics.per_class_report.contains_key(&1));
    assert!(metrics.per_class_report.contains_key(&2));

    // Every tenant in the dataset appears in the distribution.
    assert_eq!(metrics.dataset_distribution.len(), 3);
    let small = metrics
        .dataset_distribution
        .iter()
        .find(|t| t.organization_id == Some(9))
        .expect("singleton tenant in distribution");
    assert_eq!(small.sample_count, 1);

    // Per-tenant accuracy only covers tenants that reached the test split,
    // and each entry satisfies accuracy == correct / total.
    for tenant in &metrics.per_tenant_accuracy {
        assert!(tenant.total > 0);
        assert!((tenant.accuracy - tenant.correct as f64 / tenant.total as f64).abs() < 1e-12);
    }
    Ok(())
}

#[test]
fn test_metrics_json_is_diffable_across_retrains() -> Result<()> {
    let samples = tenant_dataset();
    let a = train(&samples, &TrainerConfig::default())?;
    let b = train(&samples, &TrainerConfig::default())?;
    assert_eq!(
        serde_json::to_string(&a.metrics).unwrap(),
        serde_json::to_string(&b.metrics).unwrap()
    );
    Ok(())
}

#[test]
fn test_missing_artifact_and_blank_text_degrade_quietly() -> Result<()> {
    let dir = TempDir::new().unwrap();

    // No artifact at the path: a degraded state, not an error.
    assert!(Predictor::open(dir.path().join("absent.bin"))?.is_none());

    // Blank text against a real artifact: abstention.
    let outcome = train(&spec_example_dataset(), &TrainerConfig::default())?;
    let predictor = Predictor::new(outcome.artifact);
    assert_eq!(predictor.predict(&PredictionRequest::new("  \n ")), None);
    Ok(())
}

#[test]
fn test_candidate_restriction_falls_back_to_remaining_labels() -> Result<()> {
    let outcome = train(&tenant_dataset(), &TrainerConfig::default())?;
    let predictor = Predictor::new(outcome.artifact);

    let text = "FACTURA ELECTRONICA serie F999";
    let top = predictor
        .predict(&PredictionRequest::new(text))
        .expect("unrestricted match");
    assert_eq!(top.template_id, 1);

    // Excluding the winner leaves only template 2 eligible.
    let mut request = PredictionRequest::new(text);
    request.candidate_template_ids = Some(HashSet::from([2]));
    request.threshold = 0.0;
    let fallback = predictor.predict(&request).expect("eligible fallback");
    assert_eq!(fallback.template_id, 2);

    // With a high threshold the weak fallback abstains instead.
    request.threshold = 0.99;
    assert_eq!(predictor.predict(&request), None);
    Ok(())
}

#[test]
fn test_prediction_output_shape() -> Result<()> {
    let outcome = train(&spec_example_dataset(), &TrainerConfig::default())?;
    let predictor = Predictor::new(outcome.artifact);

    let prediction = predictor
        .predict(&PredictionRequest {
            text: "FACTURA A nueva".to_string(),
            candidate_template_ids: None,
            threshold: 0.3,
        })
        .expect("confident match");

    let json = serde_json::to_value(&prediction).unwrap();
    assert!(json.get("templateId").is_some());
    assert!(json.get("score").is_some());
    Ok(())
}
