//! Compbench Document Parser
//!
//! Turns source documents into plain text for the extraction stage.
//!
//! # Overview
//!
//! Two paths lead to the same [`ParseResult`](compbench_domain::ParseResult):
//!
//! - **Remote**: a multipart upload to an Unstructured-style partition
//!   service, rate limited and retried with backoff
//! - **Local**: text-layer extraction with `pdf-extract`, available with the
//!   `local-pdf` feature
//!
//! Parsing never returns `Err`. Missing files, service failures and timeouts
//! become error results so batch callers can keep going.
//!
//! # Example Usage
//!
//! ```no_run
//! use compbench_domain::ParsingStrategy;
//! use compbench_parser::{DocumentParser, ParserConfig};
//!
//! # async fn example() -> Result<(), compbench_parser::ParserError> {
//! let parser = DocumentParser::new(ParserConfig::default().with_api_key("key"))?;
//! let result = parser.parse("proxy.pdf", ParsingStrategy::HiRes, true).await;
//!
//! match result.error {
//!     None => println!("~{} tokens", result.token_count.unwrap_or(0)),
//!     Some(e) => eprintln!("parse failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod local;
mod parser;

pub use config::{ParserConfig, DEFAULT_API_URL};
pub use error::ParserError;
pub use local::PARAGRAPH_ELEMENT;
pub use parser::{DocumentParser, SPLIT_PDF_CONCURRENCY};
