//! Pandoc template installation.
//!
//! Copies the bundled LaTeX template into pandoc's per-user data directory so
//! `pandoc --template=revquantum` picks it up.

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StyleError;
use crate::platform::HostFamily;
use crate::tex::probe::mkdir_p;

/// Files to install, relative to both the source and the data directory.
pub const TEMPLATE_MANIFEST: &[&str] = &["templates/revquantum.latex"];

/// Name to pass to `--template`.
pub const TEMPLATE_NAME: &str = "revquantum";

/// Pandoc's user data directory for `host`, given the user's home.
pub fn data_dir(host: HostFamily, home: &Path) -> Option<PathBuf> {
    match host {
        HostFamily::Unix => Some(home.join(".pandoc")),
        HostFamily::Windows => Some(home.join("AppData").join("Roaming").join("pandoc")),
        HostFamily::Unsupported => None,
    }
}

/// [`data_dir`] for the current user, failing on unsupported hosts.
pub fn user_data_dir(host: HostFamily) -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine the home directory")?;
    match data_dir(host, &home) {
        Some(dir) => Ok(dir),
        None => bail!(StyleError::UnsupportedPlatform),
    }
}

pub fn usage_hint() -> String {
    format!(
        "Pandoc template installed successfully. To use the new template, run with the \
         '--template={}' option.",
        TEMPLATE_NAME
    )
}

pub struct TemplateInstaller {
    source_dir: PathBuf,
    data_dir: PathBuf,
    manifest: Vec<String>,
}

impl TemplateInstaller {
    pub fn new(source_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            data_dir: data_dir.into(),
            manifest: TEMPLATE_MANIFEST.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directories the manifest needs, relative to the data directory. The
    /// data directory itself is the empty path.
    pub fn directories(&self) -> BTreeSet<PathBuf> {
        let mut dirs = BTreeSet::new();
        dirs.insert(PathBuf::new());
        for file in &self.manifest {
            if let Some(parent) = Path::new(file).parent() {
                dirs.insert(parent.to_path_buf());
            }
        }
        dirs
    }

    /// Create the directories and copy every manifest file. Returns the
    /// installed paths.
    pub fn install(&self) -> Result<Vec<PathBuf>> {
        for dir in self.directories() {
            let target = self.data_dir.join(&dir);
            if target.is_dir() {
                continue;
            }
            mkdir_p(&target)?;
            println!("Created {}", target.display());
        }

        let mut installed = Vec::with_capacity(self.manifest.len());
        for file in &self.manifest {
            let src = self.source_dir.join(file);
            if !src.is_file() {
                bail!(StyleError::MissingFile(src));
            }
            let dest = self.data_dir.join(file);
            println!("{} → {}", file, dest.display());
            fs::copy(&src, &dest)
                .with_context(|| format!("copying '{}' to '{}'", src.display(), dest.display()))?;
            installed.push(dest);
        }

        Ok(installed)
    }
}
