//! Load-time record selection.
//!
//! Dashboards draw a fixed random subset of the accident table so that
//! pages stay light. Sampling is seeded, so the same source definition
//! always produces the same subset, and the subset keeps the original row
//! order.

use accident_map_accident_models::AccidentRecord;
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

use crate::DatasetError;

/// Keeps only the records whose state code equals `state` exactly.
#[must_use]
pub fn select_state(records: Vec<AccidentRecord>, state: &str) -> Vec<AccidentRecord> {
    let before = records.len();
    let kept: Vec<AccidentRecord> = records.into_iter().filter(|r| r.state == state).collect();
    log::info!("Kept {} of {before} records in state {state}", kept.len());
    kept
}

/// Draws `round(len * fraction)` records without replacement.
///
/// A fraction of exactly 1 returns the input unchanged.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidSampleFraction`] if `fraction` is not in
/// `(0, 1]`.
pub fn sample(
    records: Vec<AccidentRecord>,
    fraction: f64,
    seed: u64,
) -> Result<Vec<AccidentRecord>, DatasetError> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(DatasetError::InvalidSampleFraction { fraction });
    }
    if (fraction - 1.0).abs() < f64::EPSILON {
        return Ok(records);
    }

    let total = records.len();
    let amount = sample_size(total, fraction);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keep = vec![false; total];
    for idx in rand::seq::index::sample(&mut rng, total, amount) {
        keep[idx] = true;
    }

    let sampled: Vec<AccidentRecord> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect();

    log::info!(
        "Sampled {} of {total} records (fraction {fraction}, seed {seed})",
        sampled.len()
    );
    Ok(sampled)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn sample_size(total: usize, fraction: f64) -> usize {
    ((total as f64) * fraction).round().min(total as f64) as usize
}

#[cfg(test)]
mod tests {
    use accident_map_accident_models::{FeatureFlags, Severity};

    use super::*;

    fn records(n: usize) -> Vec<AccidentRecord> {
        (0..n)
            .map(|i| AccidentRecord {
                latitude: 30.0 + f64::from(u32::try_from(i).unwrap()) * 0.01,
                longitude: -120.0,
                state: if i % 2 == 0 { "CA" } else { "NV" }.to_string(),
                severity: Severity::Moderate,
                features: FeatureFlags::empty(),
            })
            .collect()
    }

    #[test]
    fn sample_is_deterministic() {
        let a = sample(records(200), 0.25, 42).unwrap();
        let b = sample(records(200), 0.25, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sample_size_is_rounded() {
        assert_eq!(sample(records(200), 0.25, 7).unwrap().len(), 50);
        assert_eq!(sample(records(10), 0.05, 7).unwrap().len(), 1);
        assert_eq!(sample(records(9), 0.05, 7).unwrap().len(), 0);
    }

    #[test]
    fn sample_preserves_order() {
        let sampled = sample(records(500), 0.1, 3).unwrap();
        assert!(
            sampled
                .windows(2)
                .all(|w| w[0].latitude < w[1].latitude)
        );
    }

    #[test]
    fn full_fraction_is_identity() {
        assert_eq!(sample(records(17), 1.0, 1).unwrap(), records(17));
    }

    #[test]
    fn rejects_invalid_fraction() {
        for fraction in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                sample(records(5), fraction, 1),
                Err(DatasetError::InvalidSampleFraction { .. })
            ));
        }
    }

    #[test]
    fn selects_exact_state() {
        let kept = select_state(records(10), "CA");
        assert_eq!(kept.len(), 5);
        assert!(kept.iter().all(|r| r.state == "CA"));
        assert!(select_state(records(10), "ca").is_empty());
    }
}
