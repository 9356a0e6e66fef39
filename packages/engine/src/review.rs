//! Caller-facing inputs and their optional range checks
//!
//! The engine itself accepts anything; these checks mirror the card
//! constraints a caller is expected to enforce before calling.

use interval_net_algo::{ReviewOutcome, MAX_GRADE, MAX_INTERVAL, MAX_REPETITION};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

fn check_range(name: &str, value: f64, max: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 || value > max {
        return Err(EngineError::Validation(format!(
            "{} must be within [0, {}], got {}",
            name, max, value
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    pub last_predicted_interval: f64,
    pub review_interval: f64,
    pub repetition: f64,
    pub grade: f64,
}

impl PredictionInput {
    pub fn validate(&self) -> EngineResult<()> {
        check_range("lastPredictedInterval", self.last_predicted_interval, MAX_INTERVAL)?;
        check_range("reviewInterval", self.review_interval, MAX_INTERVAL)?;
        check_range("repetition", self.repetition, MAX_REPETITION)?;
        check_range("grade", self.grade, MAX_GRADE)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub last_predicted_interval: f64,
    pub review_interval: f64,
    pub repetition: f64,
    pub grade: f64,
    pub predicted_interval: f64,
    pub actual_interval: f64,
    pub actual_grade: i32,
}

impl ReviewInput {
    pub fn prediction_input(&self) -> PredictionInput {
        PredictionInput {
            last_predicted_interval: self.last_predicted_interval,
            review_interval: self.review_interval,
            repetition: self.repetition,
            grade: self.grade,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.prediction_input().validate()?;
        check_range("predictedInterval", self.predicted_interval, MAX_INTERVAL)?;
        check_range("actualInterval", self.actual_interval, MAX_INTERVAL)?;
        if !(0..=MAX_GRADE as i32).contains(&self.actual_grade) {
            return Err(EngineError::Validation(format!(
                "actualGrade must be within [0, {}], got {}",
                MAX_GRADE, self.actual_grade
            )));
        }
        Ok(())
    }
}

impl From<ReviewInput> for ReviewOutcome {
    fn from(input: ReviewInput) -> Self {
        ReviewOutcome {
            last_predicted_interval: input.last_predicted_interval,
            review_interval: input.review_interval,
            repetition: input.repetition,
            grade: input.grade,
            predicted_interval: input.predicted_interval,
            actual_interval: input.actual_interval,
            actual_grade: input.actual_grade,
        }
    }
}
