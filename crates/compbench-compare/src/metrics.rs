//! Scoring primitives: field counting, expected counts and per-result metrics

use compbench_domain::{ExtractionResult, QueryType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Expected field count for query types missing from the table
pub const DEFAULT_EXPECTED_FIELDS: usize = 50;

/// Count the populated leaf fields of an extracted JSON value
///
/// `null` counts 0 and any other scalar counts 1, whether it sits under an
/// object key, inside an array or at the top level. Objects and arrays
/// contribute the sum of their children.
pub fn count_fields(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Object(map) => map.values().map(count_fields).sum(),
        Value::Array(items) => items.iter().map(count_fields).sum(),
        _ => 1,
    }
}

/// Identifier used to group results by model: the text after the last `-`
pub fn model_key(model: &str) -> &str {
    model.rsplit('-').next().unwrap_or(model)
}

/// `fields / expected`, capped at 1.0; 0.0 when nothing is expected
pub fn completeness(fields: usize, expected: usize) -> f64 {
    if expected == 0 {
        return 0.0;
    }
    (fields as f64 / expected as f64).min(1.0)
}

/// How many fields a complete answer to each query type contains
///
/// Defaults approximate the prompt templates: 15 for basic compensation,
/// 50 detailed, 40 equity, 60 KPI and 70 for policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedFieldCounts {
    counts: BTreeMap<QueryType, usize>,
    fallback: usize,
}

impl Default for ExpectedFieldCounts {
    fn default() -> Self {
        Self::empty()
            .with(QueryType::Basic, 15)
            .with(QueryType::Detailed, 50)
            .with(QueryType::Equity, 40)
            .with(QueryType::Kpi, 60)
            .with(QueryType::Policies, 70)
    }
}

impl ExpectedFieldCounts {
    /// Table with no entries; every lookup returns the fallback
    pub fn empty() -> Self {
        Self {
            counts: BTreeMap::new(),
            fallback: DEFAULT_EXPECTED_FIELDS,
        }
    }

    /// Set the expected count for one query type
    pub fn with(mut self, query_type: QueryType, expected: usize) -> Self {
        self.counts.insert(query_type, expected);
        self
    }

    /// Set the count used for query types without an entry
    pub fn with_fallback(mut self, fallback: usize) -> Self {
        self.fallback = fallback;
        self
    }

    /// Expected count for a query type
    pub fn get(&self, query_type: QueryType) -> usize {
        self.counts.get(&query_type).copied().unwrap_or(self.fallback)
    }
}

/// Derived quality, cost and speed figures for one extraction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Backend model identifier
    pub model: String,

    /// Query template
    pub query_type: QueryType,

    /// Populated fields in the extracted data
    pub fields_extracted: usize,

    /// Fields a complete answer would contain
    pub total_fields_possible: usize,

    /// `fields_extracted / total_fields_possible`, in [0, 1]
    pub completeness_score: f64,

    /// Seconds spent on the call
    pub extraction_time: f64,

    /// Tokens consumed
    pub total_tokens: u64,

    /// Cost in USD
    pub cost_usd: f64,

    /// Error of the underlying result
    pub error: Option<String>,
}

impl ComparisonMetrics {
    /// Score one result against the expected field table
    pub fn from_result(result: &ExtractionResult, expected: &ExpectedFieldCounts) -> Self {
        let fields_extracted = if result.is_success() {
            result.extracted_data.as_ref().map_or(0, count_fields)
        } else {
            0
        };
        let total_fields_possible = expected.get(result.query_type);

        Self {
            model: result.model.clone(),
            query_type: result.query_type,
            fields_extracted,
            total_fields_possible,
            completeness_score: completeness(fields_extracted, total_fields_possible),
            extraction_time: result.extraction_time,
            total_tokens: result.total_tokens(),
            cost_usd: result.cost_usd,
            error: result.error.clone(),
        }
    }

    /// Whether the underlying result succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate figures for one model group
///
/// Averages and totals cover successful extractions only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Group key, see [`model_key`]
    pub model: String,

    /// Mean completeness score
    pub avg_completeness: f64,

    /// Mean extraction time in seconds
    pub avg_time: f64,

    /// Sum of tokens
    pub total_tokens: u64,

    /// Sum of costs in USD
    pub total_cost: f64,

    /// Results without error
    pub successful_extractions: usize,

    /// Results with error
    pub failed_extractions: usize,
}

impl ModelSummary {
    /// Successful plus failed extractions
    pub fn total_extractions(&self) -> usize {
        self.successful_extractions + self.failed_extractions
    }

    /// `"successful/total"`
    pub fn success_rate(&self) -> String {
        format!("{}/{}", self.successful_extractions, self.total_extractions())
    }
}
