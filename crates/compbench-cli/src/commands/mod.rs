//! Command implementations.

pub mod batch;
pub mod compare;
pub mod extract;
pub mod parse;

pub use self::batch::execute_batch;
pub use self::compare::execute_compare;
pub use self::extract::execute_extract;
pub use self::parse::execute_parse;

use crate::error::{CliError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Fail unless `path` is an existing file.
pub(crate) fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::NotFound(path.to_path_buf()))
    }
}

/// File name without directory and extension.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// `{stem}_q{N}_{model}.json` inside `dir`.
pub(crate) fn result_path(dir: &Path, stem: &str, query: u8, model: &str) -> PathBuf {
    dir.join(format!("{}_q{}_{}.json", stem, query, model))
}

/// Write `value` as pretty-printed JSON.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
