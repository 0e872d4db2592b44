//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing input file or directory
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Document could not be parsed
    #[error("Error parsing PDF: {0}")]
    Parse(String),

    /// Model call ended with an error result
    #[error("Error during extraction: {0}")]
    Extraction(String),

    /// Extractor construction error
    #[error(transparent)]
    Extractor(#[from] compbench_extractor::ExtractorError),

    /// Parser construction error
    #[error("Parser error: {0}")]
    Parser(#[from] compbench_parser::ParserError),

    /// Report or export error
    #[error(transparent)]
    Compare(#[from] compbench_compare::CompareError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
