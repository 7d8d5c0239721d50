//! Error handling for the Hifz engine.

use hifz_core::CoreError;
use thiserror::Error;

use crate::persist::StorageError;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the engine.
///
/// Storage read failures during startup are not surfaced: loading falls
/// back to empty state and logs instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage read failed: {0}")]
    StorageRead(StorageError),

    #[error("storage write failed: {0}")]
    StorageWrite(StorageError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("quality rating {0} out of range 0-5")]
    InvalidQuality(u8),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidQuality(quality) => EngineError::InvalidQuality(quality),
            other => EngineError::Validation(other.to_string()),
        }
    }
}
