//! Settings for the CLI: TOML file overlaid with environment variables.

use crate::error::{CliError, Result};
use compbench_extractor::ExtractorConfig;
use compbench_parser::ParserConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables read on top of the settings file.
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
/// See [`ENV_ANTHROPIC_API_KEY`].
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// See [`ENV_ANTHROPIC_API_KEY`].
pub const ENV_UNSTRUCTURED_API_KEY: &str = "UNSTRUCTURED_API_KEY";
/// See [`ENV_ANTHROPIC_API_KEY`].
pub const ENV_UNSTRUCTURED_API_URL: &str = "UNSTRUCTURED_API_URL";

/// CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the query prompt templates
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,

    /// Directory for parsed text, results and reports
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Default log level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional log file, written without ANSI colors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Model backend settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Document parser settings
    #[serde(default)]
    pub parser: ParserConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompts_dir: default_prompts_dir(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            log_file: None,
            color: true,
            extractor: ExtractorConfig::default(),
            parser: ParserConfig::default(),
        }
    }
}

impl Settings {
    /// Get the default settings file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".compbench").join("config.toml"))
    }

    /// Load settings from `explicit`, else the default path if present, else defaults,
    /// then apply the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_env(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Read a settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Overlay credentials and the parser URL from environment lookups.
    ///
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_ANTHROPIC_API_KEY) {
            self.extractor.anthropic_api_key = Some(key);
        }
        if let Some(key) = get(ENV_OPENAI_API_KEY) {
            self.extractor.openai_api_key = Some(key);
        }
        if let Some(key) = get(ENV_UNSTRUCTURED_API_KEY) {
            self.parser.api_key = Some(key);
        }
        if let Some(url) = get(ENV_UNSTRUCTURED_API_URL) {
            self.parser.api_url = url;
        }
    }

    /// Check the embedded backend and parser settings.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        self.parser.validate().map_err(CliError::Config)?;
        Ok(())
    }

    /// Create the output directory if needed and return it.
    pub fn ensure_output_dir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.as_path())
    }
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data").join("output")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
