//! OpenAI Provider Implementation
//!
//! Talks to the Chat Completions API in JSON mode. The extraction prompt is
//! sent as the system message and the document as the user message.

use crate::{error_for_status, Completion, CompletionRequest, LlmError, LlmProvider};
use async_trait::async_trait;
use compbench_domain::TokenUsage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// GPT-style backend
pub struct OpenAiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
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

    fn build_body<'a>(&'a self, request: &CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Document text:\n\n{}", request.document),
                },
            ],
            temperature: 0.0,
            max_tokens: request.max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
        }
    }
}

/// Normalize a Chat Completions response body
fn parse_response(body: &str) -> Result<Completion, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let (text, finish_reason) = match response.choices.into_iter().next() {
        Some(choice) => (choice.message.content.unwrap_or_default(), choice.finish_reason),
        None => (String::new(), None),
    };

    Ok(Completion {
        text,
        usage: TokenUsage {
            prompt: response.usage.prompt_tokens,
            completion: response.usage.completion_tokens,
            total: response.usage.total_tokens,
        },
        stop_reason: finish_reason,
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let body = self.build_body(request);

        debug!("POST {} ({} document chars)", url, request.document.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let text = response.text().await?;
        parse_response(&text)
    }
}
