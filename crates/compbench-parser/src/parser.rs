//! Core DocumentParser implementation

use crate::config::ParserConfig;
use crate::error::ParserError;
use crate::local;
use compbench_domain::{ParseResult, ParsedElement, ParsingStrategy};
use compbench_llm::{RateLimiter, RetryPolicy};
use reqwest::multipart::{Form, Part};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

/// Parallel page-split level requested from the partition service
pub const SPLIT_PDF_CONCURRENCY: u32 = 10;

/// Converts documents into plain text
///
/// Uses the remote partition service when an API key is configured and the
/// caller asks for it, otherwise extracts the text layer locally. Cloning is
/// cheap and clones share one rate limiter.
#[derive(Clone)]
pub struct DocumentParser {
    config: ParserConfig,
    client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl DocumentParser {
    /// Create a new DocumentParser
    pub fn new(config: ParserConfig) -> Result<Self, ParserError> {
        config.validate().map_err(ParserError::Config)?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ParserError::Config(format!("Failed to build HTTP client: {}", e)))?;

        if config.api_key().is_some() {
            info!("Partition service client initialized ({})", config.api_url);
        } else {
            info!("No partition API key provided, only local parsing available");
        }

        Ok(Self {
            rate_limiter: Arc::new(RateLimiter::new(config.requests_per_minute)),
            retry: config.retry_policy(),
            config,
            client,
        })
    }

    /// Whether `parse(.., use_remote = true)` will reach the service
    pub fn remote_available(&self) -> bool {
        self.config.api_key().is_some()
    }

    /// Parse one document
    ///
    /// Never fails: every error is carried in the returned result.
    pub async fn parse(
        &self,
        path: impl AsRef<Path>,
        strategy: ParsingStrategy,
        use_remote: bool,
    ) -> ParseResult {
        let path = path.as_ref();
        let start = Instant::now();

        if tokio::fs::metadata(path).await.is_err() {
            error!("File not found: {}", path.display());
            return ParseResult::failure(path, strategy, "File not found", 0.0);
        }

        let outcome = match self.config.api_key() {
            Some(api_key) if use_remote => {
                info!("Parsing {} with strategy: {}", display_name(path), strategy);
                self.parse_remote(path, strategy, api_key).await
            }
            _ => {
                info!("Parsing {} locally", display_name(path));
                self.parse_local(path).await
            }
        };

        let parse_time = start.elapsed().as_secs_f64();

        match outcome {
            Ok(elements) => {
                let file_size = tokio::fs::metadata(path).await.ok().map(|m| m.len());
                let result = ParseResult::success(path, strategy, elements, file_size, parse_time);
                if let Some(e) = &result.error {
                    error!("Error parsing {}: {}", display_name(path), e);
                    return result;
                }
                info!(
                    "Parsed {}: {} elements, ~{} tokens, {:.2}s",
                    display_name(path),
                    result.elements.as_ref().map_or(0, Vec::len),
                    result.token_count.unwrap_or(0),
                    parse_time
                );
                result
            }
            Err(e) => {
                error!("Error parsing {}: {}", display_name(path), e);
                ParseResult::failure(path, strategy, e.to_string(), parse_time)
            }
        }
    }

    /// Parse many documents with at most `max_concurrent` in flight
    ///
    /// Output order matches `paths`. A task that dies is reported as an error
    /// result for its file.
    pub async fn parse_batch(
        &self,
        paths: &[PathBuf],
        strategy: ParsingStrategy,
        use_remote: bool,
        max_concurrent: usize,
    ) -> Vec<ParseResult> {
        let parser = self.clone();
        run_batch(paths, strategy, max_concurrent, move |path| {
            let parser = parser.clone();
            async move { parser.parse(&path, strategy, use_remote).await }
        })
        .await
    }

    async fn parse_remote(
        &self,
        path: &Path,
        strategy: ParsingStrategy,
        api_key: &str,
    ) -> Result<Vec<ParsedElement>, ParserError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = display_name(path);
        let file_name = file_name.as_str();
        let timeout = self.config.timeout();

        self.retry
            .run(
                |attempt| {
                    let bytes = bytes.clone();
                    async move {
                        self.rate_limiter.acquire().await;
                        debug!("Partition attempt {} for {} ({} bytes)", attempt, file_name, bytes.len());

                        tokio::time::timeout(
                            timeout,
                            self.post_partition(api_key, file_name, bytes, strategy),
                        )
                        .await
                        .map_err(|_| ParserError::Timeout(timeout))?
                    }
                },
                ParserError::is_retryable,
            )
            .await
    }

    async fn post_partition(
        &self,
        api_key: &str,
        file_name: &str,
        bytes: Vec<u8>,
        strategy: ParsingStrategy,
    ) -> Result<Vec<ParsedElement>, ParserError> {
        let form = self.partition_form(file_name, bytes, strategy)?;

        let response = self
            .client
            .post(&self.config.api_url)
            .header("unstructured-api-key", api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ParserError::from_status(status, body));
        }

        let body = response.text().await?;
        parse_elements(&body)
    }

    fn partition_form(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        strategy: ParsingStrategy,
    ) -> Result<Form, ParserError> {
        let file = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;

        let mut form = Form::new()
            .part("files", file)
            .text("strategy", strategy.as_str());
        for language in &self.config.languages {
            form = form.text("languages", language.clone());
        }

        Ok(form
            .text("split_pdf_page", "true")
            .text("split_pdf_allow_failed", "true")
            .text("split_pdf_concurrency_level", SPLIT_PDF_CONCURRENCY.to_string()))
    }

    async fn parse_local(&self, path: &Path) -> Result<Vec<ParsedElement>, ParserError> {
        let timeout = self.config.timeout();
        let owned = path.to_path_buf();

        let task = tokio::task::spawn_blocking(move || local::extract_elements(&owned));
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ParserError::Local(format!("Extraction task failed: {}", e))),
            Err(_) => Err(ParserError::Timeout(timeout)),
        }
    }
}

/// Decode the service's element array
fn parse_elements(body: &str) -> Result<Vec<ParsedElement>, ParserError> {
    serde_json::from_str(body)
        .map_err(|e| ParserError::InvalidResponse(format!("Expected an element array: {}", e)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run `parse_one` for every path on its own task, bounded by a semaphore.
pub(crate) async fn run_batch<F, Fut>(
    paths: &[PathBuf],
    strategy: ParsingStrategy,
    max_concurrent: usize,
    parse_one: F,
) -> Vec<ParseResult>
where
    F: Fn(PathBuf) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = ParseResult> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let handles: Vec<_> = paths
        .iter()
        .cloned()
        .map(|path| {
            let semaphore = Arc::clone(&semaphore);
            let parse_one = parse_one.clone();
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                parse_one(path).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (path, handle) in paths.iter().zip(handles) {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => {
                error!("Error parsing {}: {}", path.display(), e);
                results.push(ParseResult::failure(
                    path,
                    strategy,
                    format!("Parse task failed: {}", e),
                    0.0,
                ));
            }
        }
    }

    results
}
