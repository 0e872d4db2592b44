//! Extraction result module

use crate::QueryType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token accounting for one model call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens sent to the model
    pub prompt: u64,

    /// Tokens generated by the model
    pub completion: u64,

    /// Total as reported by the backend
    pub total: u64,
}

impl TokenUsage {
    /// Usage with the total derived from its parts
    pub fn new(prompt: u64, completion: u64) -> Self {
        Self {
            prompt,
            completion,
            total: prompt + completion,
        }
    }
}

/// Result of one (document, query, model) extraction attempt
///
/// When `error` is set, `extracted_data` is `None`, all token counts are zero
/// and `cost_usd` is zero. A successful call whose response did not contain
/// parseable JSON is still a success with `extracted_data == None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Backend model identifier, e.g. `claude-sonnet-4-20250514`
    pub model: String,

    /// Query template that was run
    pub query_type: QueryType,

    /// Display name of the query
    pub query_name: String,

    /// Structured data parsed from the response
    pub extracted_data: Option<Value>,

    /// Raw response text
    #[serde(default)]
    pub raw_response: String,

    /// Token usage
    pub tokens: TokenUsage,

    /// Wall-clock extraction time in seconds
    pub extraction_time: f64,

    /// Cost in USD, rounded to 6 decimals
    pub cost_usd: f64,

    /// Error description when the extraction failed
    pub error: Option<String>,

    /// Backend-specific details (stop reason, model type, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ExtractionResult {
    /// Build a successful result
    #[allow(clippy::too_many_arguments)]
    pub fn success(
        model: impl Into<String>,
        query_type: QueryType,
        query_name: impl Into<String>,
        extracted_data: Option<Value>,
        raw_response: impl Into<String>,
        tokens: TokenUsage,
        extraction_time: f64,
        cost_usd: f64,
        metadata: Map<String, Value>,
    ) -> Self {
        Self {
            model: model.into(),
            query_type,
            query_name: query_name.into(),
            extracted_data,
            raw_response: raw_response.into(),
            tokens,
            extraction_time,
            cost_usd: cost_usd.max(0.0),
            error: None,
            metadata,
        }
    }

    /// Build a failed result: no data, zero tokens, zero cost
    pub fn failure(
        model: impl Into<String>,
        query_type: QueryType,
        query_name: impl Into<String>,
        error: impl Into<String>,
        extraction_time: f64,
    ) -> Self {
        Self {
            model: model.into(),
            query_type,
            query_name: query_name.into(),
            extracted_data: None,
            raw_response: String::new(),
            tokens: TokenUsage::default(),
            extraction_time,
            cost_usd: 0.0,
            error: Some(error.into()),
            metadata: Map::new(),
        }
    }

    /// Whether the extraction succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Total tokens consumed
    pub fn total_tokens(&self) -> u64 {
        self.tokens.total
    }
}
