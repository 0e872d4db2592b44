//! Configuration for the document parser

use compbench_llm::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default partition endpoint
pub const DEFAULT_API_URL: &str = "https://api.unstructured.io/general/v0/general";

/// Configuration for the [`DocumentParser`](crate::DocumentParser)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Partition service API key; local parsing is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Partition endpoint URL
    pub api_url: String,

    /// Requests per minute allowed against the partition service
    pub requests_per_minute: u32,

    /// OCR language hints sent with every request
    pub languages: Vec<String>,

    /// Maximum time for a single partition call (seconds)
    pub timeout_secs: u64,

    /// Total attempts per document
    pub max_retries: u32,

    /// Delay after the first failed attempt (seconds)
    pub retry_min_wait_secs: u64,

    /// Cap on the delay between attempts (seconds)
    pub retry_max_wait_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            requests_per_minute: 30,
            languages: vec!["eng".to_string(), "rus".to_string()],
            timeout_secs: 120,
            max_retries: 3,
            retry_min_wait_secs: 2,
            retry_max_wait_secs: 60,
        }
    }
}

impl ParserConfig {
    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// API key, if one is configured and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Get the call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy built from the configured bounds
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_secs(self.retry_min_wait_secs),
            Duration::from_secs(self.retry_max_wait_secs),
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("api_url must not be empty".to_string());
        }
        if self.requests_per_minute == 0 {
            return Err("requests_per_minute must be greater than 0".to_string());
        }
        if self.languages.is_empty() {
            return Err("languages must contain at least one entry".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.retry_min_wait_secs > self.retry_max_wait_secs {
            return Err("retry_min_wait_secs cannot exceed retry_max_wait_secs".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
