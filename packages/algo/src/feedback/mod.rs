//! Grade-driven feedback policy
//!
//! Turns a completed review into a training target. Starting from the
//! actual interval, a per-grade rule may average it with the predicted
//! interval, then the result is scaled by the grade's factor:
//!
//! | grade | average when          | factor |
//! |-------|-----------------------|--------|
//! | 0     | actual > predicted    | 0.4    |
//! | 1     | actual > predicted    | 0.55   |
//! | 2     | actual > predicted    | 0.7    |
//! | 3     | actual > predicted    | 0.85   |
//! | 4     | never                 | 1.0    |
//! | 5     | actual < predicted    | 1.2    |
//! | other | never                 | 0.0    |
//!
//! Failing grades pull the target down only when the learner waited longer
//! than predicted; grade 5 pulls it up only when the review came early.
//! Unknown grades zero the target instead of failing.

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_inputs, normalize_interval};
use crate::types::Exemplar;

/// When the actual interval is averaged with the prediction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    None,
    /// The learner took longer than predicted
    AverageIfLonger,
    /// The learner reviewed before the prediction
    AverageIfShorter,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRule {
    pub adjustment: Adjustment,
    pub factor: f64,
}

/// Rule for an actual grade
pub fn feedback_rule(actual_grade: i32) -> FeedbackRule {
    let (adjustment, factor) = match actual_grade {
        0 => (Adjustment::AverageIfLonger, 0.4),
        1 => (Adjustment::AverageIfLonger, 0.55),
        2 => (Adjustment::AverageIfLonger, 0.7),
        3 => (Adjustment::AverageIfLonger, 0.85),
        4 => (Adjustment::None, 1.0),
        5 => (Adjustment::AverageIfShorter, 1.2),
        _ => (Adjustment::None, 0.0),
    };
    FeedbackRule { adjustment, factor }
}

/// Training target in days, before normalisation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackTarget {
    /// Interval after the grade's adjustment, before the factor
    pub better_interval: f64,
    pub factor: f64,
    /// `better_interval * factor`
    pub target_interval: f64,
}

pub fn compute_target(predicted_interval: f64, actual_interval: f64, actual_grade: i32) -> FeedbackTarget {
    let rule = feedback_rule(actual_grade);
    let average = (actual_interval + predicted_interval) / 2.0;

    let better_interval = match rule.adjustment {
        Adjustment::AverageIfLonger if actual_interval > predicted_interval => average,
        Adjustment::AverageIfShorter if actual_interval < predicted_interval => average,
        _ => actual_interval,
    };

    FeedbackTarget {
        better_interval,
        factor: rule.factor,
        target_interval: better_interval * rule.factor,
    }
}

/// Raw description of a finished review
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub last_predicted_interval: f64,
    pub review_interval: f64,
    pub repetition: f64,
    pub grade: f64,
    pub predicted_interval: f64,
    pub actual_interval: f64,
    pub actual_grade: i32,
}

impl ReviewOutcome {
    pub fn target(&self) -> FeedbackTarget {
        compute_target(self.predicted_interval, self.actual_interval, self.actual_grade)
    }

    /// Normalised exemplar for the case history, every field clamped to [0, 1]
    pub fn to_exemplar(&self) -> Exemplar {
        let inputs = normalize_inputs(
            self.last_predicted_interval,
            self.review_interval,
            self.repetition,
            self.grade,
        );
        Exemplar::new(inputs, normalize_interval(self.target().target_interval)).clamped()
    }
}
