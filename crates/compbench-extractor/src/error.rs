//! Error types for the Extractor

use compbench_llm::LlmError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Unknown model, query or other caller input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing credentials or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider error
    #[error(transparent)]
    Llm(LlmError),

    /// Extraction call exceeded its time budget
    #[error("Timeout after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl From<LlmError> for ExtractorError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout(limit) => ExtractorError::Timeout(limit),
            other => ExtractorError::Llm(other),
        }
    }
}
