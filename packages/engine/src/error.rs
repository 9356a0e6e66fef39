use crate::storage::StorageError;

/// Engine error taxonomy
///
/// `Configuration` is fatal at startup. `Validation` only comes from the
/// optional input checks callers run before calling the engine.
/// `Persistence` is reported after the in-memory model has already been
/// updated, so the engine stays usable.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),
}

pub type EngineResult<T> = Result<T, EngineError>;
