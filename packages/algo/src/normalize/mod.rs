//! Normalisation between domain values and the network's [0, 1] range
//!
//! - Repetition: r / 128
//! - Grade: g / 5
//! - Interval: sqrt(d / 2048), a concave compression that gives short
//!   intervals (the common case) more of the output range
//! - Inverse interval: round(y² * 2048)
//!
//! Inputs are not validated. Values outside the documented ranges normalise
//! outside [0, 1] and the sigmoid network accepts them anyway; callers clamp.

use crate::types::{INPUT_UNITS, MAX_GRADE, MAX_INTERVAL, MAX_REPETITION};

pub fn normalize_repetition(repetition: f64) -> f64 {
    repetition / MAX_REPETITION
}

pub fn normalize_grade(grade: f64) -> f64 {
    grade / MAX_GRADE
}

pub fn normalize_interval(days: f64) -> f64 {
    (days / MAX_INTERVAL).sqrt()
}

/// Inverse of [`normalize_interval`] up to rounding, in whole days
///
/// Saturates at `u32::MAX`; a NaN input maps to 0.
pub fn denormalize_interval(value: f64) -> u32 {
    (value * value * MAX_INTERVAL).round() as u32
}

/// Normalises the four network inputs in layer-0 order
pub fn normalize_inputs(
    last_predicted_interval: f64,
    review_interval: f64,
    repetition: f64,
    grade: f64,
) -> [f64; INPUT_UNITS] {
    [
        normalize_interval(last_predicted_interval),
        normalize_interval(review_interval),
        normalize_repetition(repetition),
        normalize_grade(grade),
    ]
}
