//! Online trainer
//!
//! Retrains the network on the whole case history after every new exemplar:
//!
//! ```text
//! limit = epoch_factor * cases
//! repeat
//!     for each case in presentation order: forward, backpropagate, keep error
//!     rmse = sqrt(Σ e² / cases)
//!     rate = coarse if rmse >= threshold else fine
//!     shuffle presentation order
//! until limit epochs ran or rmse <= target
//! ```
//!
//! The learning rate is a two-speed schedule (0.9 / 0.1 gated at RMSE 0.02),
//! not a decay, and it carries over into the next training run. The epoch
//! cap bounds training time when the target RMSE is never reached.
//!
//! The shuffle permutes an index order owned by the trainer; the history
//! itself keeps insertion order. The generator is a seedable `ChaCha8Rng`.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::history::CaseHistory;
use crate::network::Network;
use crate::types::{
    COARSE_LEARNING_RATE, COARSE_RMSE_THRESHOLD, EPOCH_FACTOR, FINE_LEARNING_RATE,
    INITIAL_LEARNING_RATE, TARGET_RMSE,
};

// ==================== Configuration ====================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epoch_factor: usize,
    pub target_rmse: f64,
    pub coarse_rmse_threshold: f64,
    pub coarse_learning_rate: f64,
    pub fine_learning_rate: f64,
    pub initial_learning_rate: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epoch_factor: EPOCH_FACTOR,
            target_rmse: TARGET_RMSE,
            coarse_rmse_threshold: COARSE_RMSE_THRESHOLD,
            coarse_learning_rate: COARSE_LEARNING_RATE,
            fine_learning_rate: FINE_LEARNING_RATE,
            initial_learning_rate: INITIAL_LEARNING_RATE,
        }
    }
}

impl TrainingConfig {
    fn learning_rate_for(&self, rmse: f64) -> f64 {
        if rmse >= self.coarse_rmse_threshold {
            self.coarse_learning_rate
        } else {
            self.fine_learning_rate
        }
    }
}

/// Outcome of one training run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Cases in the history during this run
    pub cases: usize,
    /// Epochs actually run
    pub epochs: usize,
    /// Epoch cap for this run
    pub epoch_limit: usize,
    /// RMSE of the final epoch
    pub rmse: f64,
    /// Learning rate selected after the final epoch
    pub learning_rate: f64,
    /// Whether the target RMSE was reached
    pub converged: bool,
}

/// Root mean squared error over signed per-sample errors
pub fn root_mean_squared_error(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    let sum: f64 = errors.iter().map(|e| e * e).sum();
    (sum / errors.len() as f64).sqrt()
}

// ==================== Trainer ====================

pub struct OnlineTrainer {
    config: TrainingConfig,
    rng: ChaCha8Rng,
    learning_rate: f64,
    latest_rmse: f64,
    total_epochs: u64,
    runs: u64,
    order: Vec<usize>,
}

impl OnlineTrainer {
    /// Trainer seeded from the system clock
    pub fn new(config: TrainingConfig) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(config, seed)
    }

    /// Trainer with a fixed shuffle sequence (for testing and replay)
    pub fn with_seed(config: TrainingConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(config: TrainingConfig, rng: ChaCha8Rng) -> Self {
        let learning_rate = config.initial_learning_rate;
        Self {
            config,
            rng,
            learning_rate,
            latest_rmse: 0.0,
            total_epochs: 0,
            runs: 0,
            order: Vec::new(),
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn latest_rmse(&self) -> f64 {
        self.latest_rmse
    }

    /// Epochs run across every training call of this trainer
    pub fn total_epochs(&self) -> u64 {
        self.total_epochs
    }

    /// Training calls that ran at least one epoch
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Draws initial weights from the trainer's generator
    pub fn random_network(&mut self) -> Network {
        Network::with_random_weights(&mut self.rng)
    }

    /// Retrains `network` on `history`
    ///
    /// Returns `None` without touching the network when the history is empty.
    pub fn train(&mut self, network: &mut Network, history: &CaseHistory) -> Option<TrainingReport> {
        let cases = history.len();
        if cases == 0 {
            return None;
        }

        let epoch_limit = (self.config.epoch_factor * cases).max(1);
        self.order.clear();
        self.order.extend(0..cases);

        let mut errors = Vec::with_capacity(cases);
        let mut epochs = 0;
        let mut rmse;

        loop {
            errors.clear();
            for case in self.order.iter().filter_map(|&index| history.get(index)) {
                errors.push(network.train_sample(
                    &case.inputs(),
                    case.target_interval,
                    self.learning_rate,
                ));
            }

            rmse = root_mean_squared_error(&errors);
            self.learning_rate = self.config.learning_rate_for(rmse);
            self.order.shuffle(&mut self.rng);
            epochs += 1;

            if epochs >= epoch_limit || rmse <= self.config.target_rmse {
                break;
            }
        }

        self.latest_rmse = rmse;
        self.total_epochs += epochs as u64;
        self.runs += 1;

        Some(TrainingReport {
            cases,
            epochs,
            epoch_limit,
            rmse,
            learning_rate: self.learning_rate,
            converged: rmse <= self.config.target_rmse,
        })
    }
}
