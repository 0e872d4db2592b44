//! Compbench CLI library.
//!
//! Settings loading, log setup, prompt loading, command execution and
//! console formatting for the `compbench` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod prompts;

pub use cli::{Cli, Command};
pub use config::Settings;
pub use error::{CliError, Result};
pub use output::Formatter;
