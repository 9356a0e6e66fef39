//! interval-net engine
//!
//! Process-wide scheduling engine over `interval-net-algo`: predicts the next
//! review interval and learns from completed reviews, persisting weights and
//! the case log through a [`storage::ModelStore`].

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod review;
pub mod storage;

pub use config::EngineConfig;
pub use engine::{Engine, EngineStats, ReviewReport};
pub use error::{EngineError, EngineResult};
pub use review::{PredictionInput, ReviewInput};
pub use storage::{MemoryStore, ModelStore, SqliteStore, StorageError, StorageResult};
