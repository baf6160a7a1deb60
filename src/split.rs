//! Seeded stratified train/test splitting.
//!
//! The split is a reproducibility contract: the same dataset, fraction, and
//! seed always produce the same partition. Stratification keeps each
//! template's proportional representation in both halves.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::dataset::Sample;

/// Default random seed for splitting.
pub const DEFAULT_SEED: u64 = 42;

/// Default held-out test fraction.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// A partition of sample indices into train and test sets.
#[derive(Debug, Clone)]
pub struct TrainingSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratify `samples` by template id and split each group.
///
/// Per-group allocation: a singleton group contributes no test sample (it
/// cannot appear in both halves); larger groups allocate `round(n * fraction)`
/// test samples, clamped so each half keeps at least one sample. Groups are
/// visited in ascending template order and shuffled with a seeded [`StdRng`],
/// so the partition is deterministic.
pub fn stratified_split(samples: &[Sample], test_fraction: f64, seed: u64) -> TrainingSplit {
    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (index, sample) in samples.iter().enumerate() {
        groups.entry(sample.template_id).or_default().push(index);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (_, mut indices) in groups {
        indices.shuffle(&mut rng);
        let n = indices.len();
        let n_test = if n < 2 {
            0
        } else {
            ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1)
        };
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    TrainingSplit { train, test }
}
