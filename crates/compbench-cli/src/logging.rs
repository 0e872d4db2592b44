//! Log setup: stderr plus an optional plain-text log file.

use crate::error::{CliError, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(log_level: &str, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        log_level.trim().to_lowercase()
    }
}

/// Install the global subscriber.
pub fn init(log_level: &str, verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let directive = default_directive(log_level, verbose);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .map_err(|e| CliError::Config(format!("Invalid log level '{}': {}", directive, e)))?;

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))
}
