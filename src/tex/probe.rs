//! Filesystem probes used when choosing and populating an install tree.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Check whether files can be created in `dir`.
///
/// Creates an anonymous temporary file there and drops it straight away.
/// Any failure (missing directory, permissions, read-only mount) counts as
/// not writable.
pub fn is_writable(dir: &Path) -> bool {
    match tempfile::tempfile_in(dir) {
        Ok(_) => true,
        Err(err) => {
            debug!(dir = %dir.display(), %err, "directory is not writable");
            false
        }
    }
}

/// Create `path` and any missing ancestors.
///
/// An existing directory is fine. Anything else that stops the directory from
/// existing afterwards, including a regular file in the way, is an error.
pub fn mkdir_p(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("creating directory '{}'", path.display()))
        }
    }
}
