//! Shared constants and data types

use serde::{Deserialize, Serialize};

// ============================================================================
// Normalisation bounds
// ============================================================================

/// Largest repetition count a card is expected to reach
pub const MAX_REPETITION: f64 = 128.0;

/// Largest interval in days
pub const MAX_INTERVAL: f64 = 2048.0;

/// Highest review grade
pub const MAX_GRADE: f64 = 5.0;

// ============================================================================
// Network topology
// ============================================================================

/// Input units: last predicted interval, review interval, repetition, grade
pub const INPUT_UNITS: usize = 4;

pub const HIDDEN_UNITS: usize = 20;

/// The network predicts a single normalised interval
pub const OUTPUT_UNITS: usize = 1;

/// Units per layer, input layer first
pub const TOPOLOGY: [usize; 3] = [INPUT_UNITS, HIDDEN_UNITS, OUTPUT_UNITS];

/// Number of persisted weights: Σ units[l] * units[l-1] for l > 0
pub const WEIGHT_COUNT: usize = HIDDEN_UNITS * INPUT_UNITS + OUTPUT_UNITS * HIDDEN_UNITS;

/// Freshly initialised weights are drawn uniformly from [-range, range)
pub const INITIAL_WEIGHT_RANGE: f64 = 0.5;

// ============================================================================
// Training defaults
// ============================================================================

/// Upper bound on the rolling case history
pub const HISTORY_LIMIT: usize = 101;

/// Epoch cap per training run is `EPOCH_FACTOR * case_count`
pub const EPOCH_FACTOR: usize = 8;

/// Training stops early once epoch RMSE drops to this value
pub const TARGET_RMSE: f64 = 0.0125;

/// At or above this RMSE the coarse learning rate is used
pub const COARSE_RMSE_THRESHOLD: f64 = 0.02;

pub const COARSE_LEARNING_RATE: f64 = 0.9;
pub const FINE_LEARNING_RATE: f64 = 0.1;

/// Learning rate used before the first epoch has been measured
pub const INITIAL_LEARNING_RATE: f64 = 0.1;

// ============================================================================
// Exemplar
// ============================================================================

/// One training sample: four normalised inputs and the normalised target
///
/// Two exemplars describe the same situation when their four inputs are
/// bit-identical; the target is the value being fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    pub last_predicted_interval: f64,
    pub review_interval: f64,
    pub repetition: f64,
    pub grade: f64,
    pub target_interval: f64,
}

impl Exemplar {
    pub fn new(inputs: [f64; INPUT_UNITS], target_interval: f64) -> Self {
        Self {
            last_predicted_interval: inputs[0],
            review_interval: inputs[1],
            repetition: inputs[2],
            grade: inputs[3],
            target_interval,
        }
    }

    /// Network inputs in layer-0 order
    pub fn inputs(&self) -> [f64; INPUT_UNITS] {
        [
            self.last_predicted_interval,
            self.review_interval,
            self.repetition,
            self.grade,
        ]
    }

    /// Deduplication key comparison over the first four fields
    pub fn same_inputs(&self, other: &Exemplar) -> bool {
        self.inputs()
            .iter()
            .zip(other.inputs().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// Every field clamped into [0, 1]
    pub fn clamped(self) -> Self {
        use crate::sanitize::clamp_unit;

        Self {
            last_predicted_interval: clamp_unit(self.last_predicted_interval),
            review_interval: clamp_unit(self.review_interval),
            repetition: clamp_unit(self.repetition),
            grade: clamp_unit(self.grade),
            target_interval: clamp_unit(self.target_interval),
        }
    }

    pub fn is_within_unit_range(&self) -> bool {
        self.inputs()
            .iter()
            .chain(std::iter::once(&self.target_interval))
            .all(|v| (0.0..=1.0).contains(v))
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Health of a flattened weight vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticResult {
    pub is_healthy: bool,
    pub has_nan: bool,
    pub has_inf: bool,
    pub min_weight: f64,
    pub max_weight: f64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_count_matches_topology() {
        let expected: usize = TOPOLOGY.windows(2).map(|w| w[0] * w[1]).sum();
        assert_eq!(WEIGHT_COUNT, expected);
        assert_eq!(WEIGHT_COUNT, 100);
    }

    #[test]
    fn test_same_inputs_ignores_target() {
        let a = Exemplar::new([0.1, 0.2, 0.3, 0.4], 0.5);
        let b = Exemplar::new([0.1, 0.2, 0.3, 0.4], 0.9);
        let c = Exemplar::new([0.1, 0.2, 0.3, 0.41], 0.5);

        assert!(a.same_inputs(&b));
        assert!(!a.same_inputs(&c));
    }

    #[test]
    fn test_clamped_bounds_every_field() {
        let e = Exemplar::new([-0.2, 0.5, 1.7, f64::NAN], 1.05).clamped();

        assert_eq!(e.last_predicted_interval, 0.0);
        assert_eq!(e.review_interval, 0.5);
        assert_eq!(e.repetition, 1.0);
        assert_eq!(e.grade, 0.0);
        assert_eq!(e.target_interval, 1.0);
        assert!(e.is_within_unit_range());
    }
}
