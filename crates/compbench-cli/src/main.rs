//! Compbench CLI - compare model backends on compensation data extraction.

use clap::Parser;
use compbench_cli::commands;
use compbench_cli::logging;
use compbench_cli::{Cli, Command, Formatter, Settings};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> compbench_cli::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    logging::init(&settings.log_level, cli.verbose, settings.log_file.as_deref())?;

    let formatter = Formatter::new(!cli.no_color && settings.color);

    match cli.command {
        Command::Parse(args) => commands::execute_parse(args, &settings, &formatter).await?,
        Command::Extract(args) => commands::execute_extract(args, &settings, &formatter).await?,
        Command::Compare(args) => commands::execute_compare(args, &settings, &formatter).await?,
        Command::Batch(args) => commands::execute_batch(args, &settings, &formatter).await?,
    }

    Ok(())
}
