//! Compare command implementation.

use super::{file_stem, require_file};
use crate::cli::{parse_models, parse_queries, CompareArgs};
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompts::load_jobs;
use compbench_compare::ResultComparator;
use compbench_extractor::{create_extractor, ExtractionOrchestrator};
use compbench_parser::DocumentParser;

/// Execute the compare command.
pub async fn execute_compare(args: CompareArgs, settings: &Settings, formatter: &Formatter) -> Result<()> {
    let queries = parse_queries(&args.queries).map_err(CliError::InvalidInput)?;
    let models = parse_models(args.models.as_deref()).map_err(CliError::InvalidInput)?;
    require_file(&args.pdf)?;

    let jobs = load_jobs(&settings.prompts_dir, &queries)?;
    let extractors = models
        .iter()
        .map(|&model| create_extractor(model, &settings.extractor))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let parser = DocumentParser::new(settings.parser.clone())?;

    let name = file_stem(&args.pdf);
    println!("{}", formatter.heading(&format!("Parsing {}...", name)));
    let parsed = parser
        .parse(&args.pdf, args.options.strategy, !args.options.local)
        .await;
    if let Some(error) = parsed.error {
        return Err(CliError::Parse(error));
    }
    println!(
        "{}\n",
        formatter.success(&format!("Parsed ({} tokens)", parsed.token_count.unwrap_or(0)))
    );

    let progress = *formatter;
    let orchestrator = ExtractionOrchestrator::new(extractors)
        .with_max_concurrent(args.max_concurrent)
        .with_progress(move |result, done, total| {
            println!("{}", progress.progress(result, done, total));
        });
    let results = orchestrator.run(&parsed.text, &jobs).await;

    let mut comparator = ResultComparator::new();
    comparator.add_results(results);

    println!("\n{}\n", formatter.heading("Comparison Results"));
    println!("{}", formatter.comparison_table(&comparator.comparison_rows()));

    println!("\n{}\n", formatter.heading("Summary by Model"));
    println!("{}", formatter.summary_table(&comparator.generate_summary_stats()));

    let output_dir = settings.ensure_output_dir()?;
    let json_output = output_dir.join(format!("{}.json", name));
    let md_output = output_dir.join(format!("{}.md", name));
    let pdf_name = args
        .pdf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.clone());

    comparator.save_results_json(&json_output)?;
    comparator.save_markdown_report(&md_output, &pdf_name)?;

    println!("\n{}", formatter.success("Results saved:"));
    println!("  JSON: {}", json_output.display());
    println!("  Report: {}", md_output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ParseOptions;
    use compbench_domain::ParsingStrategy;

    fn args(pdf: &str, queries: &str, models: Option<&str>) -> CompareArgs {
        CompareArgs {
            pdf: pdf.into(),
            queries: queries.to_string(),
            models: models.map(str::to_string),
            options: ParseOptions {
                strategy: ParsingStrategy::Fast,
                local: true,
            },
            max_concurrent: 1,
        }
    }

    #[tokio::test]
    async fn test_invalid_query_rejected_first() {
        let err = execute_compare(args("missing.pdf", "1,7", None), &Settings::default(), &Formatter::new(false))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_invalid_model_rejected() {
        let err = execute_compare(
            args("missing.pdf", "1", Some("claude-sonnet,llama")),
            &Settings::default(),
            &Formatter::new(false),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("llama"));
    }

    #[tokio::test]
    async fn test_missing_pdf() {
        let err = execute_compare(args("missing.pdf", "1", None), &Settings::default(), &Formatter::new(false))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }
}
