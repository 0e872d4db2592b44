//! Compbench Compare
//!
//! Scores extraction results against each other: field completeness, token
//! usage, cost and latency per model, with Markdown and JSON output.
//!
//! Errored results never make the comparator fail. They score zero fields,
//! show up in the detailed table with their error, and are counted as
//! failures in the per-model summary without affecting its averages.
//!
//! # Example Usage
//!
//! ```no_run
//! use compbench_compare::ResultComparator;
//! # fn example(results: Vec<compbench_domain::ExtractionResult>) -> compbench_compare::Result<()> {
//! let mut comparator = ResultComparator::new();
//! comparator.add_results(results);
//!
//! println!("{}", comparator.comparison_table());
//! comparator.save_results_json("output/proxy.json".as_ref())?;
//! comparator.save_markdown_report("output/proxy.md".as_ref(), "proxy.pdf")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod comparator;
mod error;
mod export;
mod metrics;
mod report;

pub use comparator::{
    compare_single_query_results, ComparisonRow, QueryBreakdown, Recommendations,
    ResultComparator, SingleQueryComparison, SingleQueryMetric,
};
pub use error::{CompareError, Result};
pub use export::ComparisonExport;
pub use metrics::{
    completeness, count_fields, model_key, ComparisonMetrics, ExpectedFieldCounts, ModelSummary,
    DEFAULT_EXPECTED_FIELDS,
};
