//! Core ModelExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::json::parse_json_response;
use crate::pricing::calculate_cost;
use async_trait::async_trait;
use compbench_domain::{ExtractionResult, Extractor, ModelFamily, ModelType, QueryType};
use compbench_llm::{
    AnthropicProvider, Completion, CompletionRequest, LlmError, LlmProvider, OpenAiProvider,
    RateLimiter, RetryPolicy,
};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, info};

/// Runs one extraction query against one model backend
///
/// Every call goes through the extractor's own rate limiter and retry policy;
/// each attempt is bounded by the configured timeout.
pub struct ModelExtractor<P: LlmProvider> {
    provider: P,
    model_type: ModelType,
    rate_limiter: RateLimiter,
    retry: RetryPolicy,
    timeout: Duration,
    max_output_tokens: u32,
}

impl<P: LlmProvider> ModelExtractor<P> {
    /// Create an extractor around a provider using the limits in `config`
    pub fn new(provider: P, model_type: ModelType, config: &ExtractorConfig) -> Self {
        let family = model_type.family();
        Self {
            provider,
            model_type,
            rate_limiter: RateLimiter::new(config.requests_per_minute(family)),
            retry: config.retry_policy(),
            timeout: config.extraction_timeout(),
            max_output_tokens: config.max_output_tokens,
        }
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the request with rate limiting, per-attempt timeout and retry
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ExtractorError> {
        let limit = self.timeout;

        let completion = self
            .retry
            .run(
                |attempt| async move {
                    self.rate_limiter.acquire().await;
                    debug!(
                        "{} attempt {}: prompt {} chars, document {} chars",
                        self.provider.model(),
                        attempt,
                        request.prompt.len(),
                        request.document.len()
                    );

                    timeout(limit, self.provider.complete(request))
                        .await
                        .map_err(|_| LlmError::Timeout(limit))?
                },
                LlmError::is_retryable,
            )
            .await?;

        Ok(completion)
    }

    fn metadata(&self, completion: &Completion) -> Map<String, Value> {
        let stop_key = match self.model_type.family() {
            ModelFamily::Claude => "stop_reason",
            ModelFamily::Gpt => "finish_reason",
        };

        let mut metadata = Map::new();
        metadata.insert(
            stop_key.to_string(),
            completion
                .stop_reason
                .clone()
                .map_or(Value::Null, Value::String),
        );
        metadata.insert(
            "model_type".to_string(),
            Value::String(self.model_type.as_str().to_string()),
        );
        metadata
    }
}

#[async_trait]
impl<P: LlmProvider> Extractor for ModelExtractor<P> {
    fn model_name(&self) -> &str {
        self.provider.model()
    }

    async fn extract(
        &self,
        text: &str,
        prompt: &str,
        query_type: QueryType,
        query_name: &str,
    ) -> ExtractionResult {
        let model = self.provider.model();
        let start = Instant::now();
        info!("Extracting with {} ({}): query {}", model, self.model_type, query_type);

        let request = CompletionRequest::new(prompt, text, self.max_output_tokens);

        match self.complete(&request).await {
            Ok(completion) => {
                let extraction_time = start.elapsed().as_secs_f64();
                let extracted_data = parse_json_response(&completion.text);
                let cost = calculate_cost(
                    model,
                    completion.usage.prompt,
                    completion.usage.completion,
                );

                info!(
                    "{} extraction complete: {} tokens, ${:.4}, {:.2}s",
                    model, completion.usage.total, cost, extraction_time
                );

                let metadata = self.metadata(&completion);
                ExtractionResult::success(
                    model,
                    query_type,
                    query_name,
                    extracted_data,
                    completion.text,
                    completion.usage,
                    extraction_time,
                    cost,
                    metadata,
                )
            }
            Err(e) => {
                error!("{} extraction error: {}", model, e);
                ExtractionResult::failure(
                    model,
                    query_type,
                    query_name,
                    e.to_string(),
                    start.elapsed().as_secs_f64(),
                )
            }
        }
    }
}

/// Build the extractor for a model type
///
/// Fails with [`ExtractorError::Config`] when the configuration is invalid
/// or the API key for the model's family is missing.
pub fn create_extractor(
    model_type: ModelType,
    config: &ExtractorConfig,
) -> Result<Box<dyn Extractor>, ExtractorError> {
    config.validate().map_err(ExtractorError::Config)?;

    let family = model_type.family();
    let api_key = config.api_key(family).ok_or_else(|| {
        ExtractorError::Config(match family {
            ModelFamily::Claude => "ANTHROPIC_API_KEY is not set".to_string(),
            ModelFamily::Gpt => "OPENAI_API_KEY is not set".to_string(),
        })
    })?;

    let model = config.model_name(model_type);
    let endpoint = config.endpoint(family);
    let limit = config.extraction_timeout();

    let extractor: Box<dyn Extractor> = match family {
        ModelFamily::Claude => Box::new(ModelExtractor::new(
            AnthropicProvider::new(endpoint, api_key, model, limit)?,
            model_type,
            config,
        )),
        ModelFamily::Gpt => Box::new(ModelExtractor::new(
            OpenAiProvider::new(endpoint, api_key, model, limit)?,
            model_type,
            config,
        )),
    };

    info!("{} extractor initialized: {}", model_type, model);
    Ok(extractor)
}

/// Build an extractor from a model identifier such as `"claude-haiku"`
pub fn create_extractor_by_name(
    model: &str,
    config: &ExtractorConfig,
) -> Result<Box<dyn Extractor>, ExtractorError> {
    let model_type = model
        .parse::<ModelType>()
        .map_err(ExtractorError::InvalidArgument)?;
    create_extractor(model_type, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use compbench_llm::MockProvider;

    fn config() -> ExtractorConfig {
        ExtractorConfig {
            anthropic_api_key: Some("sk-ant-test".to_string()),
            openai_api_key: Some("sk-test".to_string()),
            anthropic_rpm: 600,
            openai_rpm: 600,
            ..ExtractorConfig::default()
        }
    }

    #[test]
    fn test_factory_builds_each_model() {
        let config = config();
        for model_type in ModelType::ALL {
            let extractor = create_extractor(model_type, &config).unwrap();
            assert_eq!(extractor.model_name(), config.model_name(model_type));
        }
    }

    #[test]
    fn test_factory_requires_family_key() {
        let config = ExtractorConfig {
            openai_api_key: None,
            ..config()
        };

        assert!(create_extractor(ModelType::ClaudeHaiku, &config).is_ok());
        assert!(matches!(
            create_extractor(ModelType::Gpt4, &config),
            Err(ExtractorError::Config(_))
        ));
    }

    #[test]
    fn test_factory_rejects_unknown_model() {
        assert!(matches!(
            create_extractor_by_name("llama-3", &config()),
            Err(ExtractorError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_metadata_key_follows_family() {
        let provider = MockProvider::new("{}").with_model("gpt-4-turbo-preview");
        let extractor = ModelExtractor::new(provider, ModelType::Gpt4, &config());

        let result = extractor
            .extract("text", "prompt", QueryType::Basic, "Basic Compensation")
            .await;

        assert_eq!(result.metadata["finish_reason"], "end_turn");
        assert_eq!(result.metadata["model_type"], "gpt-4");
        assert!(result.metadata.get("stop_reason").is_none());
    }
}
