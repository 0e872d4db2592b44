//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use compbench_domain::{ModelType, ParsingStrategy, QueryType};
use std::path::PathBuf;

/// Compbench - Compare model backends on compensation data extraction from PDFs.
#[derive(Debug, Parser)]
#[command(name = "compbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file path
    #[arg(short, long, global = true, env = "COMPBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a PDF file and save its text
    Parse(ParseArgs),

    /// Run one query against parsed text with one model
    Extract(ExtractArgs),

    /// Compare models across queries on one PDF
    Compare(CompareArgs),

    /// Process every PDF in a folder with one model
    Batch(BatchArgs),
}

/// Options shared by commands that parse PDFs.
#[derive(Debug, Clone, Args)]
pub struct ParseOptions {
    /// Parsing strategy: hi_res, fast, ocr_only, auto
    #[arg(short, long, default_value = "hi_res")]
    pub strategy: ParsingStrategy,

    /// Parse locally instead of calling the partition service
    #[arg(long)]
    pub local: bool,
}

/// Arguments for the parse command.
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Path to PDF file
    pub pdf: PathBuf,

    #[command(flatten)]
    pub options: ParseOptions,

    /// Output file for parsed text
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Path to parsed text file
    pub text_file: PathBuf,

    /// Query type (1-5)
    #[arg(short, long)]
    pub query: QueryType,

    /// Model: claude-sonnet, claude-haiku, gpt-4
    #[arg(short, long, default_value = "claude-sonnet")]
    pub model: ModelType,

    /// Output JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the compare command.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Path to PDF file
    pub pdf: PathBuf,

    /// Comma-separated query types (e.g. 1,2,3)
    #[arg(long, default_value = "1,2,3,4,5")]
    pub queries: String,

    /// Comma-separated models; all models when omitted
    #[arg(long)]
    pub models: Option<String>,

    #[command(flatten)]
    pub options: ParseOptions,

    /// Extractions in flight at once
    #[arg(long, default_value = "1")]
    pub max_concurrent: usize,
}

/// Arguments for the batch command.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Folder containing PDF files
    pub folder: PathBuf,

    /// Comma-separated query types
    #[arg(long, default_value = "1,2,3")]
    pub queries: String,

    /// Model to use
    #[arg(short, long, default_value = "claude-sonnet")]
    pub model: ModelType,

    #[command(flatten)]
    pub options: ParseOptions,

    /// Documents parsed at once
    #[arg(long, default_value = "3")]
    pub max_concurrent: usize,
}

/// Parse a `--queries` value; order is kept and the list must not be empty.
pub fn parse_queries(value: &str) -> Result<Vec<QueryType>, String> {
    let queries = QueryType::parse_list(value)?;
    if queries.is_empty() {
        return Err("at least one query type is required".to_string());
    }
    Ok(queries)
}

/// Parse a `--models` value; `None` selects every model.
pub fn parse_models(value: Option<&str>) -> Result<Vec<ModelType>, String> {
    let Some(value) = value else {
        return Ok(ModelType::ALL.to_vec());
    };
    let models = ModelType::parse_list(value)?;
    if models.is_empty() {
        return Err("at least one model is required".to_string());
    }
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let cli = Cli::parse_from(["compbench", "parse", "proxy.pdf", "--strategy", "fast", "--local"]);
        match cli.command {
            Command::Parse(args) => {
                assert_eq!(args.pdf, PathBuf::from("proxy.pdf"));
                assert_eq!(args.options.strategy, ParsingStrategy::Fast);
                assert!(args.options.local);
                assert!(args.output.is_none());
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from(["compbench", "extract", "proxy_parsed.txt", "-q", "3", "--model", "gpt-4"]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.query, QueryType::Equity);
                assert_eq!(args.model, ModelType::Gpt4);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_compare_defaults() {
        let cli = Cli::parse_from(["compbench", "compare", "proxy.pdf", "-v", "--no-color"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        match cli.command {
            Command::Compare(args) => {
                assert_eq!(args.queries, "1,2,3,4,5");
                assert!(args.models.is_none());
                assert_eq!(args.options.strategy, ParsingStrategy::HiRes);
                assert_eq!(args.max_concurrent, 1);
            }
            _ => panic!("Expected Compare command"),
        }
    }

    #[test]
    fn test_batch_defaults() {
        let cli = Cli::parse_from(["compbench", "batch", "pdfs/"]);
        match cli.command {
            Command::Batch(args) => {
                assert_eq!(args.queries, "1,2,3");
                assert_eq!(args.model, ModelType::ClaudeSonnet);
                assert_eq!(args.max_concurrent, 3);
            }
            _ => panic!("Expected Batch command"),
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["compbench", "extract", "t.txt", "-q", "9"]).is_err());
        assert!(Cli::try_parse_from(["compbench", "extract", "t.txt", "-q", "1", "-m", "llama"]).is_err());
        assert!(Cli::try_parse_from(["compbench", "parse", "a.pdf", "-s", "magic"]).is_err());
    }

    #[test]
    fn test_parse_queries() {
        assert_eq!(
            parse_queries("3, 1").unwrap(),
            vec![QueryType::Equity, QueryType::Basic]
        );
        assert!(parse_queries("1,6").is_err());
        assert!(parse_queries("").is_err());
    }

    #[test]
    fn test_parse_models() {
        assert_eq!(parse_models(None).unwrap(), ModelType::ALL.to_vec());
        assert_eq!(
            parse_models(Some("gpt-4,claude-haiku")).unwrap(),
            vec![ModelType::Gpt4, ModelType::ClaudeHaiku]
        );
        assert!(parse_models(Some("claude-opus")).is_err());
    }
}
