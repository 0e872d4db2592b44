//! Error types for the comparator

use thiserror::Error;

/// Result type alias for comparator persistence
pub type Result<T> = std::result::Result<T, CompareError>;

/// Failures writing reports or exports
#[derive(Error, Debug)]
pub enum CompareError {
    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
