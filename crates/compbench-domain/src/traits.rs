//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{ExtractionResult, QueryType};
use async_trait::async_trait;

/// Capability of turning document text plus a prompt into an extraction result
///
/// Implemented once per backend family (compbench-extractor). Implementations
/// never return an error: every failure is encoded in the returned
/// [`ExtractionResult`].
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Identifier of the backing model, recorded on every result
    fn model_name(&self) -> &str;

    /// Extract structured data from `text` following `prompt`
    async fn extract(
        &self,
        text: &str,
        prompt: &str,
        query_type: QueryType,
        query_name: &str,
    ) -> ExtractionResult;
}
