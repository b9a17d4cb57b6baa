//! Failure kinds that callers may want to tell apart.
//!
//! Everything else in the crate is reported through `anyhow` with context;
//! these are raised with `bail!` and can be recovered with
//! `anyhow::Error::downcast_ref::<StyleError>()`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("required file is missing: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("`{command}` did not complete successfully")]
    ToolFailed { command: String },
    #[error("no writable TeX tree found (tried: {})", display_paths(.tried))]
    NoWritableTexTree { tried: Vec<PathBuf> },
    #[error("configuration report has no '{key}' entry")]
    MissingConfigKey { key: String },
    #[error("no data directory is known for this platform")]
    UnsupportedPlatform,
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
