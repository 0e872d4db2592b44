//! Extract command implementation.

use super::{file_stem, require_file, result_path, write_json};
use crate::cli::ExtractArgs;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompts::load_prompt;
use compbench_extractor::create_extractor;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, settings: &Settings, formatter: &Formatter) -> Result<()> {
    require_file(&args.text_file)?;

    let prompt = load_prompt(&settings.prompts_dir, args.query)?;
    let extractor = create_extractor(args.model, &settings.extractor)?;
    let text = tokio::fs::read_to_string(&args.text_file).await?;

    println!("{}", formatter.info(&format!("Extracting with {}...", args.model)));
    let result = extractor
        .extract(&text, &prompt, args.query, args.query.display_name())
        .await;

    if let Some(error) = &result.error {
        return Err(CliError::Extraction(error.clone()));
    }
    if result.extracted_data.is_none() {
        println!("{}", formatter.warning("Response did not contain parseable JSON"));
    }

    println!("\n{}", formatter.success("Extraction complete"));
    println!("{}", formatter.extraction_details(&result));

    let output = match args.output {
        Some(path) => path,
        None => result_path(
            settings.ensure_output_dir()?,
            &file_stem(&args.text_file),
            args.query.number(),
            args.model.as_str(),
        ),
    };
    write_json(&output, &result)?;
    println!("\n{}", formatter.success(&format!("Saved to: {}", output.display())));

    Ok(())
}
