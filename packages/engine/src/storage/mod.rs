//! Persistence adapter for network weights and the case log
//!
//! - Weight store: the flattened weight vector, rewritten as one unit after
//!   every training run
//! - Case store: append-only log of normalised exemplars, read newest first
//!   at startup only

pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryStore;
pub use migrations::run_migrations;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use interval_net_algo::Exemplar;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("lock error: {0}")]
    LockError(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable home of the model
///
/// Implementations must make `save_weights` all-or-nothing.
pub trait ModelStore: Send + Sync {
    /// Weights in flattened order; empty when nothing was saved yet
    fn load_weights(&self) -> StorageResult<Vec<f64>>;

    /// Replaces every stored weight in one transaction
    fn save_weights(&self, weights: &[f64]) -> StorageResult<()>;

    /// Up to `limit` cases, newest first
    fn load_recent_cases(&self, limit: usize) -> StorageResult<Vec<Exemplar>>;

    fn append_case(&self, case: &Exemplar) -> StorageResult<()>;

    /// Cases ever logged
    fn case_count(&self) -> StorageResult<u64>;
}

impl<T: ModelStore + ?Sized> ModelStore for Arc<T> {
    fn load_weights(&self) -> StorageResult<Vec<f64>> {
        (**self).load_weights()
    }

    fn save_weights(&self, weights: &[f64]) -> StorageResult<()> {
        (**self).save_weights(weights)
    }

    fn load_recent_cases(&self, limit: usize) -> StorageResult<Vec<Exemplar>> {
        (**self).load_recent_cases(limit)
    }

    fn append_case(&self, case: &Exemplar) -> StorageResult<()> {
        (**self).append_case(case)
    }

    fn case_count(&self) -> StorageResult<u64> {
        (**self).case_count()
    }
}
