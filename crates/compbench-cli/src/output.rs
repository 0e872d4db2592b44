//! Output formatting for the CLI.

use colored::*;
use compbench_compare::{ComparisonRow, ModelSummary};
use compbench_domain::{ExtractionResult, ParseResult};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Detailed comparison, one row per result.
    pub fn comparison_table(&self, rows: &[ComparisonRow]) -> String {
        if rows.is_empty() {
            return self.colorize("No results to compare.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(ComparisonRow::HEADERS);
        for row in rows {
            builder.push_record(row.cells());
        }
        Self::rounded(builder)
    }

    /// Per-model summary table.
    pub fn summary_table(&self, summary: &[ModelSummary]) -> String {
        if summary.is_empty() {
            return self.colorize("No successful extractions.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Model", "Avg Completeness", "Avg Time", "Total Cost", "Success Rate"]);
        for stats in summary {
            builder.push_record([
                stats.model.to_uppercase(),
                format!("{:.1}%", stats.avg_completeness * 100.0),
                format!("{:.2}s", stats.avg_time),
                format!("${:.4}", stats.total_cost),
                stats.success_rate(),
            ]);
        }
        Self::rounded(builder)
    }

    /// Key figures of a successful parse.
    pub fn parse_details(&self, result: &ParseResult) -> String {
        let mut lines = vec![
            format!("Strategy: {}", result.strategy),
            format!("Characters: {}", result.text.chars().count()),
            format!("Tokens (est.): {}", result.token_count.unwrap_or(0)),
            format!("Parse time: {:.2}s", result.parse_time),
        ];
        if let Some(elements) = &result.elements {
            lines.push(format!("Elements: {}", elements.len()));
        }
        lines.join("\n")
    }

    /// Key figures of a successful extraction.
    pub fn extraction_details(&self, result: &ExtractionResult) -> String {
        [
            format!("Model: {}", result.model),
            format!("Query: {}", result.query_name),
            format!(
                "Tokens: {} (input: {}, output: {})",
                result.tokens.total, result.tokens.prompt, result.tokens.completion
            ),
            format!("Time: {:.2}s", result.extraction_time),
            format!("Cost: ${:.4}", result.cost_usd),
        ]
        .join("\n")
    }

    /// One progress line for a finished extraction.
    pub fn progress(&self, result: &ExtractionResult, done: usize, total: usize) -> String {
        let line = format!(
            "[{}/{}] {} - Query {}",
            done,
            total,
            result.model,
            result.query_type.number()
        );
        match &result.error {
            None => self.success(&line),
            Some(error) => self.error(&format!("{}: {}", line, error)),
        }
    }

    /// Format a section heading.
    pub fn heading(&self, message: &str) -> String {
        if self.color_enabled {
            message.bold().to_string()
        } else {
            message.to_string()
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn rounded(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
