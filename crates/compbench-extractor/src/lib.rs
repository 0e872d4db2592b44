//! Compbench Extractor
//!
//! Turns parsed document text into structured compensation data by sending
//! a query template to one or more model backends.
//!
//! # Architecture
//!
//! ```text
//! text + QueryJob ─► ExtractionOrchestrator ─► ModelExtractor<P> ─► LlmProvider
//!                                                 │
//!                                   RateLimiter, RetryPolicy, timeout
//! ```
//!
//! # Key Features
//!
//! - **One extractor per backend**: each owns its rate limiter and retry policy
//! - **Tolerant decoding**: JSON is recovered from fenced or embedded output
//! - **Cost accounting**: per-call USD cost from a per-family price table
//! - **Ordered fan-out**: results come back in (query, model) order
//!
//! # Example Usage
//!
//! ```no_run
//! use compbench_domain::{ModelType, QueryType};
//! use compbench_extractor::{create_extractor, ExtractionOrchestrator, ExtractorConfig, QueryJob};
//!
//! # async fn example() -> Result<(), compbench_extractor::ExtractorError> {
//! let config = ExtractorConfig {
//!     anthropic_api_key: Some("sk-ant-...".to_string()),
//!     ..ExtractorConfig::default()
//! };
//!
//! let orchestrator = ExtractionOrchestrator::new(vec![
//!     create_extractor(ModelType::ClaudeSonnet, &config)?,
//!     create_extractor(ModelType::ClaudeHaiku, &config)?,
//! ]);
//!
//! let jobs = vec![QueryJob::new(QueryType::Basic, "Extract executive pay as JSON")];
//! for result in orchestrator.run("...proxy statement text...", &jobs).await {
//!     println!("{}: ${:.4}", result.model, result.cost_usd);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod json;
mod orchestrator;
mod pricing;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::{create_extractor, create_extractor_by_name, ModelExtractor};
pub use json::parse_json_response;
pub use orchestrator::{ExtractionOrchestrator, ProgressCallback, QueryJob};
pub use pricing::{calculate_cost, pricing_for, Pricing};
