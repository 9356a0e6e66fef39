//! Shared fixtures for the engine integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use interval_net_algo::{Exemplar, OnlineTrainer, TrainingConfig};
use interval_net_engine::{MemoryStore, ModelStore, ReviewInput, StorageError, StorageResult};
use parking_lot::Mutex;

/// A review of a card seen twice before, graded `actual_grade`
pub fn review(actual_grade: i32, predicted_interval: f64, actual_interval: f64) -> ReviewInput {
    ReviewInput {
        last_predicted_interval: 6.0,
        review_interval: 7.0,
        repetition: 2.0,
        grade: 3.0,
        predicted_interval,
        actual_interval,
        actual_grade,
    }
}

/// A valid flattened weight vector drawn from a fixed seed
pub fn seeded_weights(seed: u64) -> Vec<f64> {
    OnlineTrainer::with_seed(TrainingConfig::default(), seed)
        .random_network()
        .flatten_weights()
}

/// Memory-backed store whose writes can be switched off
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
    saved: Mutex<Vec<f64>>,
}

impl FlakyStore {
    pub fn new(weights: Vec<f64>) -> Self {
        Self {
            saved: Mutex::new(weights.clone()),
            inner: MemoryStore::with_state(weights, Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Last weights that were written successfully
    pub fn saved_weights(&self) -> Vec<f64> {
        self.saved.lock().clone()
    }

    fn check(&self) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::LockError("store is read-only".to_string()));
        }
        Ok(())
    }
}

impl ModelStore for FlakyStore {
    fn load_weights(&self) -> StorageResult<Vec<f64>> {
        self.inner.load_weights()
    }

    fn save_weights(&self, weights: &[f64]) -> StorageResult<()> {
        self.check()?;
        self.inner.save_weights(weights)?;
        *self.saved.lock() = weights.to_vec();
        Ok(())
    }

    fn load_recent_cases(&self, limit: usize) -> StorageResult<Vec<Exemplar>> {
        self.inner.load_recent_cases(limit)
    }

    fn append_case(&self, case: &Exemplar) -> StorageResult<()> {
        self.check()?;
        self.inner.append_case(case)
    }

    fn case_count(&self) -> StorageResult<u64> {
        self.inner.case_count()
    }
}
