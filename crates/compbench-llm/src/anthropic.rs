//! Anthropic Provider Implementation
//!
//! Talks to the Claude Messages API. The extraction prompt and the document
//! are sent together as a single user message.
//!
//! # Examples
//!
//! ```no_run
//! use compbench_llm::{AnthropicProvider, CompletionRequest, LlmProvider};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), compbench_llm::LlmError> {
//! let provider = AnthropicProvider::new(
//!     "https://api.anthropic.com",
//!     "sk-ant-...",
//!     "claude-sonnet-4-20250514",
//!     Duration::from_secs(120),
//! )?;
//! let completion = provider
//!     .complete(&CompletionRequest::new("Extract pay", "...", 4096))
//!     .await?;
//! println!("{} tokens", completion.usage.total);
//! # Ok(())
//! # }
//! ```

use crate::{error_for_status, Completion, CompletionRequest, LlmError, LlmProvider};
use async_trait::async_trait;
use compbench_domain::TokenUsage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Anthropic API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Claude-style backend
pub struct AnthropicProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for the Messages API
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

/// Response from the Messages API
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Usage,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// `timeout` bounds each HTTP exchange at the transport level.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    fn build_body<'a>(&'a self, request: &CompletionRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: 0.0,
            messages: vec![Message {
                role: "user",
                content: request.combined(),
            }],
        }
    }
}

/// Normalize a Messages API response body
fn parse_response(body: &str) -> Result<Completion, LlmError> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let text = response
        .content
        .into_iter()
        .next()
        .map(|block| block.text)
        .unwrap_or_default();

    Ok(Completion {
        text,
        usage: TokenUsage::new(response.usage.input_tokens, response.usage.output_tokens),
        stop_reason: response.stop_reason,
    })
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let url = format!("{}/v1/messages", self.endpoint);
        let body = self.build_body(request);

        debug!("POST {} ({} prompt chars)", url, body.messages[0].content.len());

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let text = response.text().await?;
        parse_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(
            "https://api.anthropic.com/",
            "test-key",
            "claude-sonnet-4-20250514",
            Duration::from_secs(30),
        )
        .unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = provider();
        assert_eq!(provider.endpoint, "https://api.anthropic.com");
        assert_eq!(provider.model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider();
        let request = CompletionRequest::new("Extract pay", "CEO: $1M", 4096);
        let body = serde_json::to_value(provider.build_body(&request)).unwrap();

        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(
            body["messages"][0]["content"],
            "Extract pay\n\nDocument text:\n\nCEO: $1M"
        );
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "{\"company\": \"Acme\"}"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 15000, "output_tokens": 850}
        }"#;

        let completion = parse_response(body).unwrap();
        assert_eq!(completion.text, "{\"company\": \"Acme\"}");
        assert_eq!(completion.usage, TokenUsage::new(15000, 850));
        assert_eq!(completion.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn test_parse_response_without_content() {
        let body = r#"{"content": [], "stop_reason": "max_tokens", "usage": {"input_tokens": 10, "output_tokens": 0}}"#;
        let completion = parse_response(body).unwrap();
        assert!(completion.text.is_empty());
        assert_eq!(completion.usage.total, 10);
    }

    #[test]
    fn test_parse_response_invalid_envelope() {
        let result = parse_response("<html>Bad Gateway</html>");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }
}
