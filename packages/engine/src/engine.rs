//! Shared scheduling engine
//!
//! One `Engine` owns the network and the case history for the whole
//! process. Construct it once at startup and hand out `Arc<Engine>`.
//!
//! Concurrency:
//! - Predictions clone an `Arc` of the last published network under a brief
//!   read lock, so they never see a half-trained weight matrix and never
//!   wait for a training run.
//! - Feedback runs under a mutex: log the case, append it, retrain a private
//!   working copy, publish it, then persist the weights.

use std::sync::Arc;

use interval_net_algo::{
    diagnose_weights, CaseHistory, DiagnosticResult, Exemplar, FeedbackTarget, Network,
    OnlineTrainer, ReviewOutcome, TrainingReport, WEIGHT_COUNT,
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::review::{PredictionInput, ReviewInput};
use crate::storage::{ModelStore, StorageError, StorageResult};

struct TrainingState {
    network: Network,
    history: CaseHistory,
    trainer: OnlineTrainer,
}

/// Result of incorporating one review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewReport {
    pub target: FeedbackTarget,
    pub exemplar: Exemplar,
    /// The oldest case dropped to keep the history bounded
    pub evicted: Option<Exemplar>,
    pub training: Option<TrainingReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub history_len: usize,
    pub history_limit: usize,
    pub latest_rmse: f64,
    pub learning_rate: f64,
    pub total_epochs: u64,
    pub training_runs: u64,
    pub weights: DiagnosticResult,
}

pub struct Engine {
    config: EngineConfig,
    store: Box<dyn ModelStore>,
    published: RwLock<Arc<Network>>,
    state: Mutex<TrainingState>,
}

impl Engine {
    /// Loads weights and case history from `store`
    ///
    /// Fails with a configuration error when the stored weights do not fit
    /// the 4-20-1 topology. An empty weight store is initialised with random
    /// weights when `seed_empty_weights` is set.
    pub fn open<S>(config: EngineConfig, store: S) -> EngineResult<Self>
    where
        S: ModelStore + 'static,
    {
        let mut trainer = match config.seed {
            Some(seed) => OnlineTrainer::with_seed(config.training.clone(), seed),
            None => OnlineTrainer::new(config.training.clone()),
        };

        let stored = store.load_weights()?;
        let network = if stored.is_empty() && config.seed_empty_weights {
            let network = trainer.random_network();
            store.save_weights(&network.flatten_weights())?;
            tracing::info!(weights = WEIGHT_COUNT, "weight store was empty, initialised random weights");
            network
        } else {
            restore_network(&stored)?
        };

        let records = store.load_recent_cases(config.history_limit)?;
        let loaded = records.len();
        let history = CaseHistory::from_newest_first(records, config.history_limit);

        tracing::info!(
            loaded_cases = loaded,
            history_len = history.len(),
            history_limit = history.limit(),
            "engine ready"
        );

        Ok(Self {
            published: RwLock::new(Arc::new(network.clone())),
            state: Mutex::new(TrainingState {
                network,
                history,
                trainer,
            }),
            store: Box::new(store),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Latest published network
    pub fn snapshot(&self) -> Arc<Network> {
        Arc::clone(&self.published.read())
    }

    /// Next interval in days for a card with the given history
    pub fn predict_next_interval(
        &self,
        last_predicted_interval: f64,
        review_interval: f64,
        repetition: f64,
        grade: f64,
    ) -> u32 {
        self.snapshot()
            .predict(last_predicted_interval, review_interval, repetition, grade)
    }

    pub fn predict(&self, input: &PredictionInput) -> u32 {
        self.predict_next_interval(
            input.last_predicted_interval,
            input.review_interval,
            input.repetition,
            input.grade,
        )
    }

    /// Incorporates a completed review and retrains before returning
    ///
    /// A persistence failure is reported only after the new case and the
    /// retrained weights are live in memory.
    pub fn record_review(&self, input: ReviewInput) -> EngineResult<ReviewReport> {
        let outcome = ReviewOutcome::from(input);
        let target = outcome.target();
        let exemplar = outcome.to_exemplar();

        let mut state = self.state.lock();

        let logged = self.store.append_case(&exemplar);
        if let Err(ref e) = logged {
            tracing::warn!(error = %e, "failed to log review case");
        }

        let evicted = state.history.push(exemplar);
        let (training, saved) = self.train_locked(&mut state);

        tracing::debug!(
            actual_grade = input.actual_grade,
            better_interval = target.better_interval,
            factor = target.factor,
            target_interval = target.target_interval,
            history_len = state.history.len(),
            evicted = evicted.is_some(),
            "review incorporated"
        );

        logged.and(saved)?;

        Ok(ReviewReport {
            target,
            exemplar,
            evicted,
            training,
        })
    }

    /// Retrains on the current history without adding a case
    ///
    /// With an empty history nothing is trained or persisted.
    pub fn retrain(&self) -> EngineResult<Option<TrainingReport>> {
        let mut state = self.state.lock();
        let (training, saved) = self.train_locked(&mut state);
        saved?;
        Ok(training)
    }

    fn train_locked(&self, state: &mut TrainingState) -> (Option<TrainingReport>, StorageResult<()>) {
        let TrainingState {
            network,
            history,
            trainer,
        } = state;

        let Some(report) = trainer.train(network, history) else {
            return (None, Ok(()));
        };

        *self.published.write() = Arc::new(network.clone());

        tracing::debug!(
            cases = report.cases,
            epochs = report.epochs,
            epoch_limit = report.epoch_limit,
            rmse = report.rmse,
            learning_rate = report.learning_rate,
            converged = report.converged,
            "training run finished"
        );

        let saved = self.store.save_weights(&network.flatten_weights());
        if let Err(ref e) = saved {
            tracing::warn!(error = %e, "failed to persist weights; in-memory model kept");
        }

        (Some(report), saved)
    }

    pub fn stats(&self) -> EngineStats {
        let state = self.state.lock();
        EngineStats {
            history_len: state.history.len(),
            history_limit: state.history.limit(),
            latest_rmse: state.trainer.latest_rmse(),
            learning_rate: state.trainer.learning_rate(),
            total_epochs: state.trainer.total_epochs(),
            training_runs: state.trainer.runs(),
            weights: diagnose_weights(&state.network.flatten_weights()),
        }
    }

    /// Published weights in persistence order
    pub fn weights(&self) -> Vec<f64> {
        self.snapshot().flatten_weights()
    }

    /// Cases currently in the training window, oldest first
    pub fn history(&self) -> Vec<Exemplar> {
        self.state.lock().history.iter().copied().collect()
    }

    /// Cases ever logged by the store
    pub fn persisted_case_count(&self) -> Result<u64, StorageError> {
        self.store.case_count()
    }
}

fn restore_network(stored: &[f64]) -> EngineResult<Network> {
    let diagnostic = diagnose_weights(stored);
    if !diagnostic.is_healthy {
        return Err(EngineError::Configuration(diagnostic.message));
    }

    Network::from_weights(stored).ok_or_else(|| {
        EngineError::Configuration(format!(
            "expected {} persisted weights, found {}",
            WEIGHT_COUNT,
            stored.len()
        ))
    })
}
