//! Property-based tests for the model invariants
//!
//! - Interval normalisation inverts exactly on whole days
//! - The case history never exceeds its limit and evicts oldest first
//! - Cold-start merging keeps targets inside the merged range
//! - Weight vectors survive the network and the SQLite store unchanged
//! - Validated reviews always produce unit-range exemplars

use proptest::prelude::*;

use interval_net_algo::{
    compute_target, denormalize_interval, normalize_interval, CaseHistory, Exemplar, Network,
    ReviewOutcome, WEIGHT_COUNT,
};
use interval_net_engine::{ModelStore, ReviewInput, SqliteStore};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_unit() -> impl Strategy<Value = f64> {
    (0u64..=1000u64).prop_map(|v| v as f64 / 1000.0)
}

fn arb_exemplar() -> impl Strategy<Value = Exemplar> {
    (arb_unit(), arb_unit(), arb_unit(), arb_unit(), arb_unit())
        .prop_map(|(a, b, c, d, target)| Exemplar::new([a, b, c, d], target))
}

fn arb_weights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-8.0f64..8.0, WEIGHT_COUNT)
}

fn arb_review() -> impl Strategy<Value = ReviewInput> {
    (
        0.0f64..=2048.0,
        0.0f64..=2048.0,
        0.0f64..=128.0,
        0.0f64..=5.0,
        0.0f64..=2048.0,
        0.0f64..=2048.0,
        0i32..=5,
    )
        .prop_map(
            |(
                last_predicted_interval,
                review_interval,
                repetition,
                grade,
                predicted_interval,
                actual_interval,
                actual_grade,
            )| ReviewInput {
                last_predicted_interval,
                review_interval,
                repetition,
                grade,
                predicted_interval,
                actual_interval,
                actual_grade,
            },
        )
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn interval_round_trips_on_whole_days(days in 0u32..=2048) {
        prop_assert_eq!(denormalize_interval(normalize_interval(days as f64)), days);
    }

    #[test]
    fn history_is_bounded(limit in 1usize..=120, cases in prop::collection::vec(arb_exemplar(), 0..200)) {
        let mut history = CaseHistory::new(limit);
        let mut evicted = Vec::new();
        for case in &cases {
            if let Some(old) = history.push(*case) {
                evicted.push(old);
            }
            prop_assert!(history.len() <= limit);
        }

        prop_assert_eq!(history.len(), cases.len().min(limit));
        prop_assert_eq!(&evicted[..], &cases[..evicted.len()]);
        prop_assert_eq!(history.newest(), cases.last());
    }

    #[test]
    fn merged_targets_stay_in_range(inputs in arb_exemplar(), targets in prop::collection::vec(arb_unit(), 1..20)) {
        let records: Vec<Exemplar> = targets
            .iter()
            .map(|&t| Exemplar::new(inputs.inputs(), t))
            .collect();
        let history = CaseHistory::from_newest_first(records, 101);

        prop_assert_eq!(history.len(), 1);
        let merged = history.newest().map(|c| c.target_interval).unwrap_or(f64::NAN);
        let min = targets.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = targets.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(merged >= min - 1e-12 && merged <= max + 1e-12);
        if targets.len() == 2 {
            prop_assert!((merged - (targets[0] + targets[1]) / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn network_keeps_weight_order(weights in arb_weights()) {
        let network = Network::from_weights(&weights).unwrap();
        prop_assert_eq!(network.flatten_weights(), weights);
    }

    #[test]
    fn predictions_stay_in_interval_range(
        weights in arb_weights(),
        last in 0.0f64..=2048.0,
        review in 0.0f64..=2048.0,
        repetition in 0.0f64..=128.0,
        grade in 0.0f64..=5.0,
    ) {
        let network = Network::from_weights(&weights).unwrap();
        prop_assert!(network.predict(last, review, repetition, grade) <= 2048);
    }

    #[test]
    fn sqlite_weights_round_trip(weights in arb_weights()) {
        let store = SqliteStore::in_memory().unwrap();
        store.save_weights(&weights).unwrap();
        prop_assert_eq!(store.load_weights().unwrap(), weights);
    }

    #[test]
    fn validated_reviews_give_unit_exemplars(input in arb_review()) {
        prop_assert!(input.validate().is_ok());

        let outcome = ReviewOutcome::from(input);
        prop_assert!(outcome.to_exemplar().is_within_unit_range());

        let target = compute_target(input.predicted_interval, input.actual_interval, input.actual_grade);
        prop_assert!(target.target_interval >= 0.0);
        if input.actual_grade == 4 {
            prop_assert_eq!(target.target_interval, input.actual_interval);
        }
    }
}
