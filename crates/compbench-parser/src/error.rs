//! Error types for the document parser
//!
//! These never leave the crate boundary as `Err`: [`DocumentParser::parse`]
//! folds them into `ParseResult::error`.
//!
//! [`DocumentParser::parse`]: crate::DocumentParser::parse

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while parsing a document
#[derive(Error, Debug)]
pub enum ParserError {
    /// Invalid parser configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading the source file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure talking to the partition service
    #[error("HTTP error: {0}")]
    Http(String),

    /// Error status from the partition service
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Service answered 429
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Call did not complete in time
    #[error("Timeout after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Response was not an element array
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Built without local extraction support
    #[error("Local parsing requires the local-pdf feature")]
    LocalUnavailable,

    /// Local extraction failed
    #[error("Local parsing failed: {0}")]
    Local(String),
}

impl ParserError {
    /// Whether another attempt against the service might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ParserError::Http(_) | ParserError::RateLimited | ParserError::Timeout(_) => true,
            ParserError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Map an error status and body to an error
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            ParserError::RateLimited
        } else {
            ParserError::Api {
                status: status.as_u16(),
                message: body,
            }
        }
    }
}

impl From<reqwest::Error> for ParserError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ParserError::InvalidResponse(e.to_string())
        } else {
            ParserError::Http(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ParserError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ParserError::RateLimited
        ));
        assert!(matches!(
            ParserError::from_status(StatusCode::UNAUTHORIZED, "bad key".into()),
            ParserError::Api { status: 401, .. }
        ));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ParserError::RateLimited.is_retryable());
        assert!(ParserError::Timeout(Duration::from_secs(120)).is_retryable());
        assert!(ParserError::Http("connection reset".into()).is_retryable());
        assert!(ParserError::from_status(StatusCode::BAD_GATEWAY, String::new()).is_retryable());
        assert!(!ParserError::from_status(StatusCode::UNPROCESSABLE_ENTITY, String::new()).is_retryable());
        assert!(!ParserError::InvalidResponse("not an array".into()).is_retryable());
        assert!(!ParserError::LocalUnavailable.is_retryable());
    }
}
