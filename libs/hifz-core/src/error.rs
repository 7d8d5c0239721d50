//! Error types for hifz-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced by the core domain logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid verse key: {0}")]
    InvalidKey(String),

    #[error("unrecognized status: {0}")]
    InvalidStatus(String),

    #[error("quality rating {0} out of range 0-5")]
    InvalidQuality(u8),
}
