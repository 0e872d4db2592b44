//! Compbench Domain Layer
//!
//! This crate contains the value objects and capability traits shared by every
//! other Compbench crate. It has no I/O and no knowledge of any particular
//! model backend or parsing service.
//!
//! ## Key Concepts
//!
//! - **ParseResult**: plain text (plus element metadata) recovered from a source document
//! - **ExtractionResult**: one model's structured answer to one query template
//! - **QueryType**: the fixed set of compensation extraction templates
//! - **ModelType**: the fixed set of supported model backends
//! - **Extractor**: the capability every backend family implements
//!
//! ## Invariants
//!
//! Both result types are built through their `success` / `failure`
//! constructors, which keep the error and payload fields mutually exclusive.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extraction;
pub mod model;
pub mod parse;
pub mod query;
pub mod traits;

// Re-exports for convenience
pub use extraction::{ExtractionResult, TokenUsage};
pub use model::{ModelFamily, ModelType};
pub use parse::{ParseMetadata, ParseResult, ParsedElement, ParsingStrategy};
pub use query::QueryType;
pub use traits::Extractor;

/// Approximate token count for a block of text (1 token per 4 bytes).
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_floors() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdefg"), 1);
        assert_eq!(estimate_tokens(&"x".repeat(400)), 100);
    }
}
