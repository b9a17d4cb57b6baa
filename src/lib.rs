//! Build, package and install DocStrip-based LaTeX style packages.
//!
//! The crate wraps the steps a package author otherwise runs by hand:
//!
//! - **Compile** - `latex <pkg>.ins` for the style file, `pdflatex <pkg>.dtx`
//!   for the manual
//! - **Package** - a TDS-layout `<pkg>.tds.zip` and a CTAN upload `<pkg>.zip`
//! - **Install** - copy into a writable TeX tree and refresh its filename
//!   database
//! - **Pandoc template** - copy the bundled template into pandoc's data
//!   directory
//!
//! # Architecture
//!
//! ```text
//! cli ──► builder::StyleBuilder ──► process::CommandRunner ──► latex, pdflatex, texhash
//!              │        │
//!              │        └─► artifact::archive (zip)
//!              └─► tex::TexContext ──► tex::KpseLocator ──► kpsewhich, initexmf
//!
//! template::TemplateInstaller (separate binary)
//! ```
//!
//! All external tools run through [`process::CommandRunner`], so the whole
//! pipeline can be driven by [`process::mock::MockRunner`] in tests.

pub mod artifact;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod preflight;
pub mod process;
pub mod template;
pub mod tex;

pub use builder::{CtanManifest, Manifest, PackageName, StyleBuilder};
pub use config::Config;
pub use error::StyleError;
pub use platform::{HostFamily, Platform, TexDistribution};
pub use tex::{KpseLocator, TexContext, TexLocator};
