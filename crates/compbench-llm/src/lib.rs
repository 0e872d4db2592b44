//! Compbench LLM Provider Layer
//!
//! Backend implementations behind one async [`LlmProvider`] trait, plus the
//! two primitives every outbound call in Compbench goes through.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted responses for testing
//! - `AnthropicProvider`: Claude models via the Messages API
//! - `OpenAiProvider`: GPT models via the Chat Completions API
//!
//! # Primitives
//!
//! - `RateLimiter`: minimum spacing between calls to one backend
//! - `RetryPolicy`: bounded exponential backoff around a single call
//!
//! # Examples
//!
//! ```
//! use compbench_llm::{CompletionRequest, LlmProvider, MockProvider};
//!
//! # async fn example() {
//! let provider = MockProvider::new("{\"company\": \"Acme\"}");
//! let request = CompletionRequest::new("Extract the company", "Acme Corp 2024 proxy", 4096);
//! let completion = provider.complete(&request).await.unwrap();
//! assert_eq!(completion.text, "{\"company\": \"Acme\"}");
//! # }
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod openai;
pub mod rate_limit;
pub mod retry;

use async_trait::async_trait;
use compbench_domain::TokenUsage;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
pub use rate_limit::RateLimiter;
pub use retry::RetryPolicy;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or transport error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-retryable error status from the API
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Call did not complete in time
    #[error("Timeout after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether a fresh attempt might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::RateLimitExceeded | LlmError::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LlmError::InvalidResponse(e.to_string())
        } else {
            LlmError::Communication(e.to_string())
        }
    }
}

/// One extraction call: instructions, document, and an output budget
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Extraction instructions (the query template)
    pub prompt: String,

    /// Document text the instructions apply to
    pub document: String,

    /// Maximum tokens the model may generate
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a new request
    pub fn new(prompt: impl Into<String>, document: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            document: document.into(),
            max_tokens,
        }
    }

    /// Prompt and document combined into a single user message
    pub fn combined(&self) -> String {
        format!("{}\n\nDocument text:\n\n{}", self.prompt, self.document)
    }
}

/// Normalized model response
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Raw response text
    pub text: String,

    /// Token usage reported by the backend
    pub usage: TokenUsage,

    /// Why generation stopped (`end_turn`, `stop`, `max_tokens`, ...)
    pub stop_reason: Option<String>,
}

/// An LLM backend that can answer a [`CompletionRequest`]
///
/// Implementations always request deterministic output (temperature 0).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier sent to the backend
    fn model(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;
}

/// Map a non-success HTTP response to an [`LlmError`]
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        Err(LlmError::RateLimitExceeded)
    } else if status.is_server_error() {
        Err(LlmError::Communication(format!("HTTP {}: {}", status, body)))
    } else {
        Err(LlmError::Api {
            status: status.as_u16(),
            message: body,
        })
    }
}

/// Mock LLM provider for deterministic testing
///
/// Scripted outcomes are returned in order; once the script is exhausted
/// every call returns the default response.
///
/// # Examples
///
/// ```
/// use compbench_llm::{CompletionRequest, LlmError, LlmProvider, MockProvider};
///
/// # async fn example() {
/// let provider = MockProvider::new("{}")
///     .then_error(LlmError::RateLimitExceeded)
///     .then_respond("{\"ok\": true}");
///
/// let request = CompletionRequest::new("prompt", "text", 100);
/// assert!(provider.complete(&request).await.is_err());
/// assert_eq!(provider.complete(&request).await.unwrap().text, "{\"ok\": true}");
/// assert_eq!(provider.complete(&request).await.unwrap().text, "{}");
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    usage: TokenUsage,
    delay: Option<Duration>,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock-model".to_string(),
            default_response: response.into(),
            usage: TokenUsage::new(1000, 200),
            delay: None,
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Set the reported model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the token usage reported on every successful call
    pub fn with_usage(mut self, prompt: u64, completion: u64) -> Self {
        self.usage = TokenUsage::new(prompt, completion);
        self
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful response
    pub fn then_respond(self, response: impl Into<String>) -> Self {
        self.lock_script().push_back(Ok(response.into()));
        self
    }

    /// Queue an error
    pub fn then_error(self, error: LlmError) -> Self {
        self.lock_script().push_back(Err(error));
        self
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, LlmError>>> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, LlmError> {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.lock_script().pop_front();
        let text = match next {
            Some(outcome) => outcome?,
            None => self.default_response.clone(),
        };

        Ok(Completion {
            text,
            usage: self.usage,
            stop_reason: Some("end_turn".to_string()),
        })
    }
}
