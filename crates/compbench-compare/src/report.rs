//! Markdown report rendering

use crate::comparator::{percent, ResultComparator};
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Append one formatted line to a `String`
macro_rules! push_line {
    ($out:expr, $($arg:tt)*) => {{
        $out.push_str(&format!($($arg)*));
        $out.push('\n');
    }};
}

impl ResultComparator {
    /// Render the full comparison report for one document
    pub fn generate_markdown_report(&self, pdf_name: &str) -> String {
        let mut out = String::new();
        self.write_report(&mut out, pdf_name);
        out
    }

    fn write_report(&self, out: &mut String, pdf_name: &str) {
        push_line!(out, "# PDF Extraction Comparison Report\n");
        push_line!(out, "**PDF File:** {}", pdf_name);
        push_line!(out, "**Total Extractions:** {}\n", self.results().len());

        push_line!(out, "## Summary by Model\n");
        let summary = self.generate_summary_stats();
        for stats in &summary {
            push_line!(out, "### {}\n", stats.model.to_uppercase());
            push_line!(out, "- **Average Completeness:** {}", percent(stats.avg_completeness));
            push_line!(out, "- **Average Time:** {:.2}s", stats.avg_time);
            push_line!(out, "- **Total Tokens:** {}", thousands(stats.total_tokens));
            push_line!(out, "- **Total Cost:** ${:.4}", stats.total_cost);
            push_line!(out, "- **Success Rate:** {}\n", stats.success_rate());
        }

        push_line!(out, "## Detailed Comparison\n");
        push_line!(out, "{}\n", self.comparison_table());

        push_line!(out, "## Query Type Breakdown\n");
        for breakdown in self.query_breakdown() {
            push_line!(
                out,
                "### Query {}: {}\n",
                breakdown.query_type.number(),
                breakdown.query_type.display_name()
            );
            push_line!(out, "- **Average Completeness:** {}", percent(breakdown.avg_completeness));
            push_line!(out, "- **Average Cost:** ${:.4}", breakdown.avg_cost);
            push_line!(out, "- **Models Tested:** {}\n", breakdown.models_tested);
        }

        push_line!(out, "## Recommendations\n");
        if let Some(rec) = self.recommendations() {
            push_line!(
                out,
                "- **Best Completeness:** {} ({})",
                rec.best_completeness.model.to_uppercase(),
                percent(rec.best_completeness.avg_completeness)
            );
            push_line!(
                out,
                "- **Most Cost-Effective:** {} (${:.4} total)",
                rec.most_cost_effective.model.to_uppercase(),
                rec.most_cost_effective.total_cost
            );
            push_line!(
                out,
                "- **Fastest:** {} ({:.2}s avg)",
                rec.fastest.model.to_uppercase(),
                rec.fastest.avg_time
            );
        }
    }

    /// Render the report and write it to `path`
    pub fn save_markdown_report(&self, path: &Path, pdf_name: &str) -> Result<String> {
        let report = self.generate_markdown_report(pdf_name);
        std::fs::write(path, &report)?;
        info!("Report saved to {}", path.display());
        Ok(report)
    }
}

/// Group digits in threes with commas: `1234567` -> `"1,234,567"`
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(15_850), "15,850");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_empty_report_has_every_section() {
        let report = ResultComparator::new().generate_markdown_report("empty.pdf");
        assert!(report.contains("**PDF File:** empty.pdf"));
        assert!(report.contains("**Total Extractions:** 0"));
        for section in [
            "## Summary by Model",
            "## Detailed Comparison",
            "## Query Type Breakdown",
            "## Recommendations",
        ] {
            assert!(report.contains(section), "missing {section}");
        }
        assert!(!report.contains("**Best Completeness:**"));
        assert!(report.starts_with("# PDF Extraction Comparison Report\n\n"));
        assert!(report.ends_with("## Recommendations\n\n"));
    }
}
