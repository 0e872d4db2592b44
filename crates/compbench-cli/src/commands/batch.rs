//! Batch command implementation.

use super::{file_stem, result_path, write_json};
use crate::cli::{parse_queries, BatchArgs};
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompts::load_jobs;
use compbench_extractor::create_extractor;
use compbench_parser::DocumentParser;
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the batch command.
pub async fn execute_batch(args: BatchArgs, settings: &Settings, formatter: &Formatter) -> Result<()> {
    let queries = parse_queries(&args.queries).map_err(CliError::InvalidInput)?;
    if !args.folder.is_dir() {
        return Err(CliError::NotFound(args.folder));
    }

    let pdfs = find_pdfs(&args.folder)?;
    if pdfs.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "No PDF files found in {}",
            args.folder.display()
        )));
    }
    println!("{}\n", formatter.info(&format!("Found {} PDF files", pdfs.len())));

    let jobs = load_jobs(&settings.prompts_dir, &queries)?;
    let extractor = create_extractor(args.model, &settings.extractor)?;
    let parser = DocumentParser::new(settings.parser.clone())?;
    let output_dir = settings.ensure_output_dir()?;

    let parsed = parser
        .parse_batch(
            &pdfs,
            args.options.strategy,
            !args.options.local,
            args.max_concurrent,
        )
        .await;

    let total = parsed.iter().filter(|d| d.is_success()).count() * jobs.len();
    let mut written = 0;
    let mut skipped = 0;
    for document in parsed {
        let name = file_stem(&document.file_path);
        if let Some(error) = &document.error {
            println!("{}", formatter.error(&format!("Error parsing {}: {}", name, error)));
            skipped += 1;
            continue;
        }

        for job in &jobs {
            let result = extractor
                .extract(&document.text, &job.prompt, job.query_type, &job.query_name)
                .await;
            println!("{}", formatter.progress(&result, written + 1, total));

            let path = result_path(output_dir, &name, job.query_type.number(), args.model.as_str());
            write_json(&path, &result)?;
            written += 1;
        }
    }

    info!("Batch finished: {} results written, {} documents skipped", written, skipped);
    println!("\n{}", formatter.success("Batch processing complete!"));
    println!("Results saved to: {}", output_dir.display());
    if skipped > 0 {
        println!("{}", formatter.warning(&format!("{} document(s) could not be parsed", skipped)));
    }

    Ok(())
}

/// `*.pdf` files directly inside `folder`, sorted by name.
fn find_pdfs(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ParseOptions;
    use compbench_domain::{ModelType, ParsingStrategy};

    fn args(folder: &Path) -> BatchArgs {
        BatchArgs {
            folder: folder.to_path_buf(),
            queries: "1,2,3".to_string(),
            model: ModelType::ClaudeHaiku,
            options: ParseOptions {
                strategy: ParsingStrategy::HiRes,
                local: true,
            },
            max_concurrent: 3,
        }
    }

    #[tokio::test]
    async fn test_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute_batch(args(&dir.path().join("nope")), &Settings::default(), &Formatter::new(false))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_folder_without_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), "x").unwrap();
        let err = execute_batch(args(dir.path()), &Settings::default(), &Formatter::new(false))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No PDF files found"));
    }

    #[test]
    fn test_find_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let names: Vec<_> = find_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }
}
