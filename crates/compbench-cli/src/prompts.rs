//! Prompt template loading.

use crate::error::{CliError, Result};
use compbench_domain::QueryType;
use compbench_extractor::QueryJob;
use std::path::Path;

/// Read the prompt template for `query_type` from `prompts_dir`.
pub fn load_prompt(prompts_dir: &Path, query_type: QueryType) -> Result<String> {
    let path = prompts_dir.join(query_type.prompt_file());
    if !path.is_file() {
        return Err(CliError::NotFound(path));
    }
    Ok(std::fs::read_to_string(&path)?)
}

/// Load one job per query type, in the given order.
pub fn load_jobs(prompts_dir: &Path, query_types: &[QueryType]) -> Result<Vec<QueryJob>> {
    query_types
        .iter()
        .map(|&query_type| Ok(QueryJob::new(query_type, load_prompt(prompts_dir, query_type)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("3_equity_plans.txt"), "List equity plans as JSON.").unwrap();

        let prompt = load_prompt(dir.path(), QueryType::Equity).unwrap();
        assert_eq!(prompt, "List equity plans as JSON.");
    }

    #[test]
    fn test_missing_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_prompt(dir.path(), QueryType::Kpi).unwrap_err();
        assert!(err.to_string().contains("4_kpi_metrics.txt"));
    }

    #[test]
    fn test_load_jobs_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        for query_type in QueryType::ALL {
            std::fs::write(dir.path().join(query_type.prompt_file()), query_type.display_name()).unwrap();
        }

        let jobs = load_jobs(dir.path(), &[QueryType::Policies, QueryType::Basic]).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].query_type, QueryType::Policies);
        assert_eq!(jobs[0].prompt, "Policies & Governance");
        assert_eq!(jobs[1].query_name, "Basic Compensation");
    }
}
