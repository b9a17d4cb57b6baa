//! Optional `style-builder.toml` project configuration.
//!
//! Every key has a default, so a package directory without the file builds
//! the `revquantum` package with the stock TeX tool names.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::PackageName;

pub const CONFIG_FILENAME: &str = "style-builder.toml";

/// Default package built when no configuration names one.
pub const DEFAULT_PACKAGE: &str = "revquantum";

/// Pins the install tree and skips discovery.
pub const TEX_ROOT_ENV: &str = "STYLE_BUILDER_TEX_ROOT";

/// Log filter for the binaries (`tracing_subscriber::EnvFilter` syntax).
pub const LOG_ENV: &str = "STYLE_BUILDER_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub package: PackageName,
    pub ctan_extra_files: Vec<String>,
    pub tools: ToolNames,
}

/// Executable names for the external TeX tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolNames {
    pub latex: String,
    pub pdflatex: String,
    pub kpsewhich: String,
    pub texhash: String,
    pub initexmf: String,
}

impl Default for ToolNames {
    fn default() -> Self {
        Self {
            latex: "latex".to_string(),
            pdflatex: "pdflatex".to_string(),
            kpsewhich: "kpsewhich".to_string(),
            texhash: "texhash".to_string(),
            initexmf: "initexmf".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    package: Option<PackageToml>,
    ctan: Option<CtanToml>,
    tools: Option<ToolNames>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageToml {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CtanToml {
    #[serde(default)]
    extra_files: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: PackageName::from_static(DEFAULT_PACKAGE),
            ctan_extra_files: Vec::new(),
            tools: ToolNames::default(),
        }
    }
}

impl Config {
    pub fn path_in(work_dir: &Path) -> PathBuf {
        work_dir.join(CONFIG_FILENAME)
    }

    /// Load `style-builder.toml` from `work_dir`, or defaults if it is absent.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let path = Self::path_in(work_dir);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config '{}'", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let parsed: ConfigToml = toml::from_str(text)?;
        let defaults = Self::default();

        let package = match parsed.package {
            Some(package) => PackageName::new(&package.name)?,
            None => defaults.package,
        };

        Ok(Self {
            package,
            ctan_extra_files: parsed.ctan.map(|c| c.extra_files).unwrap_or_default(),
            tools: parsed.tools.unwrap_or_default(),
        })
    }
}
