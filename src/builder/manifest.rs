//! What gets shipped where.

use anyhow::{bail, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::StyleError;

/// Built extension → TDS subtree. The package name is appended as the last
/// directory.
pub const TDS_LAYOUT: &[(&str, &[&str])] = &[("sty", &["tex", "latex"]), ("pdf", &["doc", "latex"])];

/// Name of the style package, e.g. `revquantum`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            bail!("package name is empty");
        }
        if name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace())
            || name.starts_with('.')
        {
            bail!(
                "invalid package name '{}': must be a single file stem without separators or whitespace",
                name
            );
        }
        Ok(Self(name.to_string()))
    }

    pub(crate) fn from_static(name: &'static str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<name>.<ext>`
    pub fn file(&self, ext: &str) -> String {
        format!("{}.{}", self.0, ext)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Built files and their directory inside a TeX tree, ordered by filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    pub fn for_package(package: &PackageName) -> Self {
        let entries = TDS_LAYOUT
            .iter()
            .map(|(ext, subtree)| {
                let mut segments: Vec<String> = subtree.iter().map(|s| s.to_string()).collect();
                segments.push(package.as_str().to_string());
                (package.file(ext), segments)
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(file, segments)| (file.as_str(), segments.as_slice()))
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn target(&self, file: &str) -> Option<&[String]> {
        self.entries.get(file).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Files in a CTAN upload, in archive order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtanManifest {
    files: Vec<String>,
}

impl CtanManifest {
    /// The TDS zip, the DocStrip sources, the manual and the readme, then any
    /// extras.
    pub fn for_package(package: &PackageName, extra_files: &[String]) -> Self {
        let mut files = vec![
            package.file("tds.zip"),
            package.file("dtx"),
            package.file("ins"),
            package.file("pdf"),
            "README.md".to_string(),
        ];
        for extra in extra_files {
            if !files.contains(extra) {
                files.push(extra.clone());
            }
        }
        Self { files }
    }

    pub fn from_files(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}

/// Fail with [`StyleError::MissingFile`] on the first file that is not a
/// regular file under `dir`.
pub fn require_files<'a>(dir: &Path, files: impl IntoIterator<Item = &'a str>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for file in files {
        let path = dir.join(file);
        if !path.is_file() {
            bail!(StyleError::MissingFile(path));
        }
        paths.push(path);
    }
    Ok(paths)
}
