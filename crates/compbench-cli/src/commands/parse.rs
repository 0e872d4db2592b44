//! Parse command implementation.

use super::{file_stem, require_file};
use crate::cli::ParseArgs;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use compbench_parser::DocumentParser;

/// Execute the parse command.
pub async fn execute_parse(args: ParseArgs, settings: &Settings, formatter: &Formatter) -> Result<()> {
    require_file(&args.pdf)?;

    let parser = DocumentParser::new(settings.parser.clone())?;
    if !args.options.local && !parser.remote_available() {
        println!(
            "{}",
            formatter.warning("UNSTRUCTURED_API_KEY is not set, parsing locally")
        );
    }

    let name = file_stem(&args.pdf);
    println!("{}", formatter.info(&format!("Parsing {}...", name)));
    let result = parser
        .parse(&args.pdf, args.options.strategy, !args.options.local)
        .await;

    if let Some(error) = result.error {
        return Err(CliError::Parse(error));
    }

    println!("\n{}", formatter.success(&format!("Successfully parsed {}", name)));
    println!("{}", formatter.parse_details(&result));

    let output = match args.output {
        Some(path) => path,
        None => settings
            .ensure_output_dir()?
            .join(format!("{}_parsed.txt", name)),
    };
    tokio::fs::write(&output, &result.text).await?;
    println!("\n{}", formatter.success(&format!("Saved to: {}", output.display())));

    Ok(())
}
