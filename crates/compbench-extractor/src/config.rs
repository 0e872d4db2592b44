//! Configuration for the Extractor

use compbench_domain::{ModelFamily, ModelType};
use compbench_llm::{anthropic, openai, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for model extractors
///
/// Credentials are optional here; the factory reports a missing key only for
/// the backend family that is actually requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Anthropic API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,

    /// OpenAI API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// Anthropic API base URL
    pub anthropic_endpoint: String,

    /// OpenAI API base URL
    pub openai_endpoint: String,

    /// Model id used for `claude-sonnet`
    pub claude_sonnet_model: String,

    /// Model id used for `claude-haiku`
    pub claude_haiku_model: String,

    /// Model id used for `gpt-4`
    pub openai_gpt4_model: String,

    /// Requests per minute per Claude extractor
    pub anthropic_rpm: u32,

    /// Requests per minute per GPT extractor
    pub openai_rpm: u32,

    /// Total attempts per extraction
    pub max_retries: u32,

    /// Delay after the first failed attempt (seconds)
    pub retry_min_wait_secs: u64,

    /// Cap on the delay between attempts (seconds)
    pub retry_max_wait_secs: u64,

    /// Maximum time for a single model call (seconds)
    pub extraction_timeout_secs: u64,

    /// Output token budget per call
    pub max_output_tokens: u32,
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            openai_api_key: None,
            anthropic_endpoint: anthropic::DEFAULT_ENDPOINT.to_string(),
            openai_endpoint: openai::DEFAULT_ENDPOINT.to_string(),
            claude_sonnet_model: "claude-sonnet-4-20250514".to_string(),
            claude_haiku_model: "claude-3-5-haiku-20241022".to_string(),
            openai_gpt4_model: "gpt-4-turbo-preview".to_string(),
            anthropic_rpm: 50,
            openai_rpm: 60,
            max_retries: 3,
            retry_min_wait_secs: 2,
            retry_max_wait_secs: 60,
            extraction_timeout_secs: 120,
            max_output_tokens: 4096,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: short timeouts and few retries for quick runs
    pub fn aggressive() -> Self {
        Self {
            max_retries: 2,
            retry_max_wait_secs: 10,
            extraction_timeout_secs: 60,
            max_output_tokens: 2048,
            ..Self::default()
        }
    }

    /// Lenient preset: long timeouts and more retries for large filings
    pub fn lenient() -> Self {
        Self {
            max_retries: 5,
            retry_max_wait_secs: 120,
            extraction_timeout_secs: 300,
            max_output_tokens: 8192,
            ..Self::default()
        }
    }

    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Retry policy built from the configured bounds
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_secs(self.retry_min_wait_secs),
            Duration::from_secs(self.retry_max_wait_secs),
        )
    }

    /// Backend model id for a model type
    pub fn model_name(&self, model_type: ModelType) -> &str {
        match model_type {
            ModelType::ClaudeSonnet => &self.claude_sonnet_model,
            ModelType::ClaudeHaiku => &self.claude_haiku_model,
            ModelType::Gpt4 => &self.openai_gpt4_model,
        }
    }

    /// Non-empty API key for a family, if configured
    pub fn api_key(&self, family: ModelFamily) -> Option<&str> {
        let key = match family {
            ModelFamily::Claude => self.anthropic_api_key.as_deref(),
            ModelFamily::Gpt => self.openai_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    /// API base URL for a family
    pub fn endpoint(&self, family: ModelFamily) -> &str {
        match family {
            ModelFamily::Claude => &self.anthropic_endpoint,
            ModelFamily::Gpt => &self.openai_endpoint,
        }
    }

    /// Requests per minute for a family
    pub fn requests_per_minute(&self, family: ModelFamily) -> u32 {
        match family {
            ModelFamily::Claude => self.anthropic_rpm,
            ModelFamily::Gpt => self.openai_rpm,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.anthropic_rpm == 0 || self.openai_rpm == 0 {
            return Err("requests per minute must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.retry_min_wait_secs > self.retry_max_wait_secs {
            return Err("retry_min_wait_secs cannot exceed retry_max_wait_secs".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        for model in ModelType::ALL {
            if self.model_name(model).trim().is_empty() {
                return Err(format!("model name for {} must not be empty", model));
            }
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
