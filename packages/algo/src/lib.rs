//! # interval-net-algo - neural spaced-repetition core
//!
//! Review intervals are predicted by a small feed-forward network that is
//! retrained online after every completed review, instead of a fixed formula
//! such as SM-2.
//!
//! - **Normalisation** - domain values to and from the network's [0, 1] range
//! - **Network** - fixed 4-20-1 sigmoid network, forward pass and backpropagation
//! - **Case history** - bounded, cold-start deduplicated training window
//! - **Online trainer** - epoch loop with a two-speed learning rate
//! - **Feedback policy** - grade-indexed rules that turn a review into a target
//!
//! This crate does no I/O and no logging; persistence and shared access live
//! in `interval-net-engine`.
//!
//! ## Modules
//!
//! - [`normalize`] - repetition, grade and interval mappings
//! - [`network`] - layers, forward pass, backpropagation
//! - [`history`] - rolling case window
//! - [`trainer`] - online training loop
//! - [`feedback`] - review outcome to training exemplar
//! - [`sanitize`] - numeric health checks
//! - [`types`] - constants and the exemplar type
//!
//! ## Example
//!
//! ```rust
//! use interval_net_algo::{CaseHistory, OnlineTrainer, ReviewOutcome, TrainingConfig};
//!
//! let mut trainer = OnlineTrainer::with_seed(TrainingConfig::default(), 42);
//! let mut network = trainer.random_network();
//! let mut history = CaseHistory::default();
//!
//! let outcome = ReviewOutcome {
//!     last_predicted_interval: 3.0,
//!     review_interval: 4.0,
//!     repetition: 2.0,
//!     grade: 3.0,
//!     predicted_interval: 6.0,
//!     actual_interval: 7.0,
//!     actual_grade: 4,
//! };
//! history.push(outcome.to_exemplar());
//! let report = trainer.train(&mut network, &history).unwrap();
//! assert!(report.epochs <= report.epoch_limit);
//!
//! let days = network.predict(6.0, 7.0, 3.0, 4.0);
//! assert!(days <= 2048);
//! ```

pub mod feedback;
pub mod history;
pub mod network;
pub mod normalize;
pub mod sanitize;
pub mod trainer;
pub mod types;

pub use feedback::{compute_target, feedback_rule, Adjustment, FeedbackRule, FeedbackTarget, ReviewOutcome};
pub use history::CaseHistory;
pub use network::{sigmoid, sigmoid_derivative, Layer, Network};
pub use normalize::{
    denormalize_interval, normalize_grade, normalize_inputs, normalize_interval,
    normalize_repetition,
};
pub use sanitize::{clamp_unit, diagnose_weights, has_invalid_values};
pub use trainer::{root_mean_squared_error, OnlineTrainer, TrainingConfig, TrainingReport};
pub use types::*;
