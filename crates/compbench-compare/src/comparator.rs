//! Aggregation over a set of extraction results

use crate::metrics::{model_key, ComparisonMetrics, ExpectedFieldCounts, ModelSummary};
use compbench_domain::{ExtractionResult, QueryType};
use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::Style;

/// One rendered line of the detailed comparison table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Upper-cased model key
    pub model: String,
    /// Query number
    pub query: u8,
    /// Populated fields
    pub fields: usize,
    /// Completeness as a percentage with one decimal
    pub completeness: String,
    /// Seconds with two decimals
    pub time: String,
    /// Total tokens
    pub tokens: u64,
    /// Dollar cost with four decimals
    pub cost: String,
    /// Error text or `-`
    pub error: String,
}

impl ComparisonRow {
    /// Column headers, in order
    pub const HEADERS: [&'static str; 8] = [
        "Model",
        "Query",
        "Fields",
        "Completeness",
        "Time (s)",
        "Tokens",
        "Cost ($)",
        "Error",
    ];

    fn from_metrics(m: &ComparisonMetrics) -> Self {
        Self {
            model: model_key(&m.model).to_uppercase(),
            query: m.query_type.number(),
            fields: m.fields_extracted,
            completeness: percent(m.completeness_score),
            time: format!("{:.2}", m.extraction_time),
            tokens: m.total_tokens,
            cost: format!("${:.4}", m.cost_usd),
            error: m.error.clone().unwrap_or_else(|| "-".to_string()),
        }
    }

    /// Cell values in column order
    pub fn cells(&self) -> [String; 8] {
        [
            self.model.clone(),
            self.query.to_string(),
            self.fields.to_string(),
            self.completeness.clone(),
            self.time.clone(),
            self.tokens.to_string(),
            self.cost.clone(),
            self.error.clone(),
        ]
    }
}

/// Averages for one query type over its successful results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryBreakdown {
    /// Query template
    pub query_type: QueryType,
    /// Mean completeness
    pub avg_completeness: f64,
    /// Mean cost in USD
    pub avg_cost: f64,
    /// Number of successful results averaged
    pub models_tested: usize,
}

/// Best model group on each axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Highest average completeness
    pub best_completeness: ModelSummary,
    /// Lowest total cost
    pub most_cost_effective: ModelSummary,
    /// Lowest average time
    pub fastest: ModelSummary,
}

/// Collects extraction results and scores them against each other
#[derive(Debug, Clone, Default)]
pub struct ResultComparator {
    results: Vec<ExtractionResult>,
    expected: ExpectedFieldCounts,
}

impl ResultComparator {
    /// Create an empty comparator with the default expected field counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty comparator with a custom expected field table
    pub fn with_expected_fields(expected: ExpectedFieldCounts) -> Self {
        Self {
            results: Vec::new(),
            expected,
        }
    }

    /// Add one result
    pub fn add_result(&mut self, result: ExtractionResult) {
        self.results.push(result);
    }

    /// Add several results, keeping their order
    pub fn add_results(&mut self, results: impl IntoIterator<Item = ExtractionResult>) {
        self.results.extend(results);
    }

    /// Results in insertion order
    pub fn results(&self) -> &[ExtractionResult] {
        &self.results
    }

    /// Metrics for every result, in insertion order
    pub fn calculate_metrics(&self) -> Vec<ComparisonMetrics> {
        self.results
            .iter()
            .map(|result| ComparisonMetrics::from_result(result, &self.expected))
            .collect()
    }

    /// Per-model aggregates in the order models first appear
    ///
    /// Models whose every extraction failed are left out.
    pub fn generate_summary_stats(&self) -> Vec<ModelSummary> {
        let mut groups: Vec<(String, Vec<ComparisonMetrics>)> = Vec::new();
        for metrics in self.calculate_metrics() {
            let key = model_key(&metrics.model);
            match groups.iter_mut().find(|(k, _)| k == key) {
                Some((_, members)) => members.push(metrics),
                None => groups.push((key.to_string(), vec![metrics])),
            }
        }

        groups
            .into_iter()
            .filter_map(|(model, members)| summarize(model, &members))
            .collect()
    }

    /// One table row per result
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        self.calculate_metrics()
            .iter()
            .map(ComparisonRow::from_metrics)
            .collect()
    }

    /// Detailed comparison rendered as a Markdown table
    pub fn comparison_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(ComparisonRow::HEADERS);
        for row in self.comparison_rows() {
            builder.push_record(row.cells());
        }

        let mut table = builder.build();
        table.with(Style::markdown());
        table.to_string()
    }

    /// Per query type averages, ascending by query number
    pub fn query_breakdown(&self) -> Vec<QueryBreakdown> {
        let metrics = self.calculate_metrics();

        QueryType::ALL
            .iter()
            .filter_map(|&query_type| {
                let successful: Vec<_> = metrics
                    .iter()
                    .filter(|m| m.query_type == query_type && m.is_success())
                    .collect();
                if successful.is_empty() {
                    return None;
                }

                let n = successful.len() as f64;
                Some(QueryBreakdown {
                    query_type,
                    avg_completeness: successful.iter().map(|m| m.completeness_score).sum::<f64>() / n,
                    avg_cost: successful.iter().map(|m| m.cost_usd).sum::<f64>() / n,
                    models_tested: successful.len(),
                })
            })
            .collect()
    }

    /// Best model on each axis; `None` when no model has a success
    ///
    /// Ties go to the model that appeared first.
    pub fn recommendations(&self) -> Option<Recommendations> {
        let summary = self.generate_summary_stats();

        Some(Recommendations {
            best_completeness: first_best(&summary, |s| s.avg_completeness, |a, b| a > b)?.clone(),
            most_cost_effective: first_best(&summary, |s| s.total_cost, |a, b| a < b)?.clone(),
            fastest: first_best(&summary, |s| s.avg_time, |a, b| a < b)?.clone(),
        })
    }
}

fn summarize(model: String, members: &[ComparisonMetrics]) -> Option<ModelSummary> {
    let successful: Vec<_> = members.iter().filter(|m| m.is_success()).collect();
    if successful.is_empty() {
        return None;
    }

    let n = successful.len() as f64;
    Some(ModelSummary {
        model,
        avg_completeness: successful.iter().map(|m| m.completeness_score).sum::<f64>() / n,
        avg_time: successful.iter().map(|m| m.extraction_time).sum::<f64>() / n,
        total_tokens: successful.iter().map(|m| m.total_tokens).sum(),
        total_cost: successful.iter().map(|m| m.cost_usd).sum(),
        successful_extractions: successful.len(),
        failed_extractions: members.len() - successful.len(),
    })
}

/// First item whose key beats every earlier one
pub(crate) fn first_best<T>(
    items: &[T],
    key: impl Fn(&T) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let value = key(item);
        match best {
            Some((_, current)) if !better(value, current) => {}
            _ => best = Some((item, value)),
        }
    }
    best.map(|(item, _)| item)
}

/// `0.4` -> `"40.0%"`
pub(crate) fn percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Per-model figures within a single-query comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleQueryMetric {
    /// Backend model identifier
    pub model: String,
    /// Completeness score
    pub completeness: f64,
    /// Seconds
    pub time: f64,
    /// USD
    pub cost: f64,
    /// Total tokens
    pub tokens: u64,
}

/// Side-by-side view of several models answering the same query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleQueryComparison {
    /// Query template compared
    pub query_type: QueryType,
    /// Number of results compared
    pub models_compared: usize,
    /// One entry per result, in input order
    pub metrics: Vec<SingleQueryMetric>,
    /// Model with the highest completeness
    pub best_by_completeness: Option<String>,
    /// Model with the lowest cost
    pub best_by_cost: Option<String>,
    /// Model with the lowest extraction time
    pub best_by_speed: Option<String>,
}

/// Compare results of one query across models
///
/// Every result takes part, including errored ones (which score 0).
pub fn compare_single_query_results(
    results: &[ExtractionResult],
    query_type: QueryType,
) -> SingleQueryComparison {
    let mut comparator = ResultComparator::new();
    comparator.add_results(results.iter().cloned());
    let metrics = comparator.calculate_metrics();

    let best = |key: fn(&ComparisonMetrics) -> f64, better: fn(f64, f64) -> bool| {
        first_best(&metrics, key, better).map(|m| m.model.clone())
    };

    SingleQueryComparison {
        query_type,
        models_compared: results.len(),
        best_by_completeness: best(|m| m.completeness_score, |a, b| a > b),
        best_by_cost: best(|m| m.cost_usd, |a, b| a < b),
        best_by_speed: best(|m| m.extraction_time, |a, b| a < b),
        metrics: metrics
            .iter()
            .map(|m| SingleQueryMetric {
                model: m.model.clone(),
                completeness: m.completeness_score,
                time: m.extraction_time,
                cost: m.cost_usd,
                tokens: m.total_tokens,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compbench_domain::TokenUsage;
    use serde_json::{json, Map, Value};

    fn success(model: &str, query_type: QueryType, data: Value, time: f64, cost: f64) -> ExtractionResult {
        ExtractionResult::success(
            model,
            query_type,
            query_type.display_name(),
            Some(data),
            "",
            TokenUsage::new(1000, 200),
            time,
            cost,
            Map::new(),
        )
    }

    fn failure(model: &str, query_type: QueryType) -> ExtractionResult {
        ExtractionResult::failure(model, query_type, query_type.display_name(), "Rate limit exceeded", 3.0)
    }

    #[test]
    fn test_calculate_metrics() {
        let mut comparator = ResultComparator::new();
        comparator.add_result(success(
            "claude-sonnet",
            QueryType::Basic,
            json!({"company": "Test Corp", "year": "2024", "executives": [{"name": "CEO", "salary": 1}]}),
            5.0,
            0.05,
        ));

        let metrics = comparator.calculate_metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].fields_extracted, 4);
        assert_eq!(metrics[0].total_fields_possible, 15);
        assert!((metrics[0].completeness_score - 4.0 / 15.0).abs() < 1e-12);
        assert_eq!(metrics[0].total_tokens, 1200);
    }

    #[test]
    fn test_errored_result_scores_zero() {
        let mut comparator = ResultComparator::new();
        comparator.add_result(failure("gpt-4-turbo-preview", QueryType::Kpi));

        let metrics = comparator.calculate_metrics();
        assert_eq!(metrics[0].fields_extracted, 0);
        assert_eq!(metrics[0].completeness_score, 0.0);
        assert_eq!(metrics[0].error.as_deref(), Some("Rate limit exceeded"));
    }

    #[test]
    fn test_summary_excludes_failures_from_averages() {
        let mut comparator = ResultComparator::new();
        comparator.add_results([
            success("claude-sonnet", QueryType::Basic, json!({"a": 1, "b": 2, "c": 3}), 4.0, 0.03),
            failure("claude-sonnet", QueryType::Detailed),
            success("claude-sonnet", QueryType::Equity, json!({"a": 1}), 2.0, 0.01),
        ]);

        let summary = comparator.generate_summary_stats();
        assert_eq!(summary.len(), 1);

        let sonnet = &summary[0];
        assert_eq!(sonnet.model, "sonnet");
        assert_eq!(sonnet.successful_extractions, 2);
        assert_eq!(sonnet.failed_extractions, 1);
        assert_eq!(sonnet.success_rate(), "2/3");
        assert_eq!(sonnet.avg_time, 3.0);
        assert_eq!(sonnet.total_tokens, 2400);
        assert!((sonnet.total_cost - 0.04).abs() < 1e-12);
        let expected = (3.0 / 15.0 + 1.0 / 40.0) / 2.0;
        assert!((sonnet.avg_completeness - expected).abs() < 1e-12);
    }

    #[test]
    fn test_summary_order_and_all_failed_groups() {
        let mut comparator = ResultComparator::new();
        comparator.add_results([
            failure("gpt-4-turbo-preview", QueryType::Basic),
            success("claude-3-5-haiku-20241022", QueryType::Basic, json!({}), 1.0, 0.0),
            success("claude-sonnet-4-20250514", QueryType::Basic, json!({}), 1.0, 0.0),
            success("claude-3-5-haiku-20241022", QueryType::Kpi, json!({}), 1.0, 0.0),
        ]);

        let keys: Vec<_> = comparator
            .generate_summary_stats()
            .into_iter()
            .map(|s| s.model)
            .collect();
        assert_eq!(keys, vec!["20241022", "20250514"]);
    }

    #[test]
    fn test_comparison_rows() {
        let mut comparator = ResultComparator::new();
        comparator.add_results([
            success("claude-sonnet", QueryType::Basic, json!({"a": 1, "b": 2, "c": 3}), 4.567, 0.05),
            failure("gpt-4", QueryType::Basic),
        ]);

        let rows = comparator.comparison_rows();
        assert_eq!(
            rows[0],
            ComparisonRow {
                model: "SONNET".to_string(),
                query: 1,
                fields: 3,
                completeness: "20.0%".to_string(),
                time: "4.57".to_string(),
                tokens: 1200,
                cost: "$0.0500".to_string(),
                error: "-".to_string(),
            }
        );
        assert_eq!(rows[1].model, "4");
        assert_eq!(rows[1].error, "Rate limit exceeded");
        assert_eq!(rows[1].tokens, 0);
    }

    #[test]
    fn test_comparison_table_is_markdown() {
        let mut comparator = ResultComparator::new();
        comparator.add_result(success("model-a", QueryType::Basic, json!({"x": 1}), 1.0, 0.0));

        let table = comparator.comparison_table();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('|'));
        assert!(lines[0].contains("Completeness"));
        assert!(lines[1].contains("---"));
        assert!(lines[2].contains("A"));
        assert!(lines[2].contains("6.7%"));
    }

    #[test]
    fn test_query_breakdown() {
        let mut comparator = ResultComparator::new();
        comparator.add_results([
            success("m-a", QueryType::Kpi, json!({"x": 1}), 1.0, 0.02),
            success("m-b", QueryType::Basic, json!({"x": 1, "y": 2}), 1.0, 0.01),
            success("m-a", QueryType::Basic, json!({}), 1.0, 0.03),
            failure("m-b", QueryType::Kpi),
            failure("m-a", QueryType::Policies),
        ]);

        let breakdown = comparator.query_breakdown();
        let types: Vec<_> = breakdown.iter().map(|b| b.query_type).collect();
        assert_eq!(types, vec![QueryType::Basic, QueryType::Kpi]);

        assert_eq!(breakdown[0].models_tested, 2);
        assert!((breakdown[0].avg_cost - 0.02).abs() < 1e-12);
        assert_eq!(breakdown[1].models_tested, 1);
    }

    #[test]
    fn test_recommendations_ties_go_to_first_group() {
        let mut comparator = ResultComparator::new();
        comparator.add_results([
            success("m-a", QueryType::Basic, json!({"x": 1}), 2.0, 0.01),
            success("m-b", QueryType::Basic, json!({"x": 1}), 2.0, 0.01),
        ]);

        let recommendations = comparator.recommendations().unwrap();
        assert_eq!(recommendations.best_completeness.model, "a");
        assert_eq!(recommendations.most_cost_effective.model, "a");
        assert_eq!(recommendations.fastest.model, "a");
    }

    #[test]
    fn test_recommendations_need_a_success() {
        let mut comparator = ResultComparator::new();
        assert!(comparator.recommendations().is_none());
        comparator.add_result(failure("m-a", QueryType::Basic));
        assert!(comparator.recommendations().is_none());
    }

    #[test]
    fn test_single_query_comparison() {
        let results = [
            success("claude-sonnet", QueryType::Basic, json!({"a": 1, "b": 2}), 6.0, 0.05),
            success("claude-haiku", QueryType::Basic, json!({"a": 1}), 2.0, 0.004),
            success("gpt-4", QueryType::Basic, json!({"a": 1, "b": 2}), 9.0, 0.12),
        ];

        let comparison = compare_single_query_results(&results, QueryType::Basic);
        assert_eq!(comparison.models_compared, 3);
        assert_eq!(comparison.metrics.len(), 3);
        assert_eq!(comparison.best_by_completeness.as_deref(), Some("claude-sonnet"));
        assert_eq!(comparison.best_by_cost.as_deref(), Some("claude-haiku"));
        assert_eq!(comparison.best_by_speed.as_deref(), Some("claude-haiku"));
    }

    #[test]
    fn test_single_query_comparison_empty() {
        let comparison = compare_single_query_results(&[], QueryType::Equity);
        assert_eq!(comparison.models_compared, 0);
        assert!(comparison.best_by_completeness.is_none());
        assert!(comparison.best_by_cost.is_none());
        assert!(comparison.best_by_speed.is_none());
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.4), "40.0%");
        assert_eq!(percent(1.0), "100.0%");
        assert_eq!(percent(0.0), "0.0%");
    }
}
