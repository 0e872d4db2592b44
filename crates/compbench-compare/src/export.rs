//! JSON export of a comparison run

use crate::comparator::ResultComparator;
use crate::error::Result;
use crate::metrics::{ComparisonMetrics, ModelSummary};
use compbench_domain::ExtractionResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Everything a comparison run produced, as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonExport {
    /// Raw results in insertion order
    pub results: Vec<ExtractionResult>,
    /// One entry per result
    pub metrics: Vec<ComparisonMetrics>,
    /// Per-model aggregates
    pub summary: Vec<ModelSummary>,
}

impl ResultComparator {
    /// Snapshot of results, metrics and summary
    pub fn export(&self) -> ComparisonExport {
        ComparisonExport {
            results: self.results().to_vec(),
            metrics: self.calculate_metrics(),
            summary: self.generate_summary_stats(),
        }
    }

    /// Write [`export`](Self::export) as pretty-printed JSON
    pub fn save_results_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.export())?;
        std::fs::write(path, json)?;
        info!("Results saved to {}", path.display());
        Ok(())
    }
}
