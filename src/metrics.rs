//! Evaluation metrics for one training run.
//!
//! Aggregates held-out predictions into global accuracy, a per-class report,
//! and per-tenant statistics. The metrics JSON has a stable shape: struct
//! field order is fixed, the per-class report is keyed in ascending label
//! order, and both tenant collections preserve first-seen insertion order.
//! The insertion ordering is a documented determinism contract — it makes
//! metrics files diffable across retrains of the same dataset.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::dataset::{Sample, TenantKey};
use crate::split::TrainingSplit;

/// Precision/recall/F1 for one template label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of held-out samples with this true label.
    pub support: usize,
}

/// Accuracy of test-split predictions for one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantAccuracy {
    pub organization_id: Option<i64>,
    pub company_id: Option<i64>,
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

/// Sample count for one tenant over the entire dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantCount {
    pub organization_id: Option<i64>,
    pub company_id: Option<i64>,
    pub sample_count: usize,
}

/// Evaluation statistics for one training run, written once, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub accuracy: f64,
    /// Per-label report in ascending label order.
    pub per_class_report: BTreeMap<i64, ClassReport>,
    pub train_size: usize,
    pub test_size: usize,
    /// Test-split accuracy grouped by tenant, first-seen order. Tenants with
    /// no test-split samples do not appear here.
    pub per_tenant_accuracy: Vec<TenantAccuracy>,
    /// Full-dataset sample counts per tenant, first-seen order. Every tenant
    /// present anywhere in the data appears here.
    pub dataset_distribution: Vec<TenantCount>,
}

/// Aggregate held-out predictions into [`Metrics`].
///
/// `predicted[i]` is the predicted template id for sample `split.test[i]`.
pub fn compute_metrics(samples: &[Sample], split: &TrainingSplit, predicted: &[i64]) -> Metrics {
    debug_assert_eq!(split.test.len(), predicted.len());

    let truth: Vec<i64> = split
        .test
        .iter()
        .map(|&i| samples[i].template_id)
        .collect();

    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    let accuracy = correct as f64 / split.test.len().max(1) as f64;

    Metrics {
        accuracy,
        per_class_report: per_class_report(&truth, predicted),
        train_size: split.train.len(),
        test_size: split.test.len(),
        per_tenant_accuracy: per_tenant_accuracy(samples, split, predicted),
        dataset_distribution: dataset_distribution(samples),
    }
}

/// Contingency-table precision/recall/F1 per label.
///
/// Covers every label present in the held-out truth or in the predictions.
fn per_class_report(truth: &[i64], predicted: &[i64]) -> BTreeMap<i64, ClassReport> {
    let mut true_positive: BTreeMap<i64, usize> = BTreeMap::new();
    let mut predicted_count: BTreeMap<i64, usize> = BTreeMap::new();
    let mut support: BTreeMap<i64, usize> = BTreeMap::new();

    for (&t, &p) in truth.iter().zip(predicted) {
        *support.entry(t).or_insert(0) += 1;
        *predicted_count.entry(p).or_insert(0) += 1;
        if t == p {
            *true_positive.entry(t).or_insert(0) += 1;
        }
    }

    let mut labels: BTreeSet<i64> = support.keys().copied().collect();
    labels.extend(predicted_count.keys());

    labels
        .into_iter()
        .map(|label| {
            let tp = *true_positive.get(&label).unwrap_or(&0) as f64;
            let predicted_n = *predicted_count.get(&label).unwrap_or(&0) as f64;
            let support_n = *support.get(&label).unwrap_or(&0);

            let precision = if predicted_n > 0.0 { tp / predicted_n } else { 0.0 };
            let recall = if support_n > 0 { tp / support_n as f64 } else { 0.0 };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            (label, ClassReport {
                precision,
                recall,
                f1,
                support: support_n,
            })
        })
        .collect()
}

/// Group test-split outcomes by tenant, preserving first-seen order.
fn per_tenant_accuracy(
    samples: &[Sample],
    split: &TrainingSplit,
    predicted: &[i64],
) -> Vec<TenantAccuracy> {
    let mut order: Vec<TenantKey> = Vec::new();
    let mut stats: HashMap<TenantKey, (usize, usize)> = HashMap::new();

    for (&index, &prediction) in split.test.iter().zip(predicted) {
        let sample = &samples[index];
        let key = sample.tenant_key();
        let entry = stats.entry(key).or_insert_with(|| {
            order.push(key);
            (0, 0)
        });
        entry.0 += 1;
        if prediction == sample.template_id {
            entry.1 += 1;
        }
    }

    order
        .into_iter()
        .map(|key| {
            let (total, correct) = stats[&key];
            TenantAccuracy {
                organization_id: key.organization_id,
                company_id: key.company_id,
                total,
                correct,
                accuracy: correct as f64 / total.max(1) as f64,
            }
        })
        .collect()
}

/// Count samples per tenant over the whole dataset, preserving first-seen order.
fn dataset_distribution(samples: &[Sample]) -> Vec<TenantCount> {
    let mut order: Vec<TenantKey> = Vec::new();
    let mut counts: HashMap<TenantKey, usize> = HashMap::new();

    for sample in samples {
        let key = sample.tenant_key();
        let entry = counts.entry(key).or_insert_with(|| {
            order.push(key);
            0
        });
        *entry += 1;
    }

    order
        .into_iter()
        .map(|key| TenantCount {
            organization_id: key.organization_id,
            company_id: key.company_id,
            sample_count: counts[&key],
        })
        .collect()
}
