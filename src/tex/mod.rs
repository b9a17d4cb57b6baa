//! Choosing the TeX tree to install into.
//!
//! Discovery order is the system tree (found through `kpsewhich`), then the
//! per-user tree. The first one that passes [`probe::is_writable`] wins and is
//! remembered by the [`TexContext`] for the rest of the run.

pub mod discover;
pub mod probe;

use anyhow::{bail, Result};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ToolNames;
use crate::error::StyleError;
use crate::platform::Platform;
use crate::process::CommandRunner;

/// Where candidate install trees come from.
pub trait TexLocator {
    fn system_root(&self) -> Result<PathBuf>;

    fn user_root(&self) -> Result<PathBuf>;

    fn is_writable(&self, dir: &Path) -> bool {
        probe::is_writable(dir)
    }
}

/// Locator backed by the installed TeX toolchain.
pub struct KpseLocator<R> {
    runner: R,
    platform: Platform,
    kpsewhich: String,
    initexmf: String,
}

impl<R: CommandRunner> KpseLocator<R> {
    pub fn new(runner: R, platform: Platform, tools: &ToolNames) -> Self {
        Self {
            runner,
            platform,
            kpsewhich: tools.kpsewhich.clone(),
            initexmf: tools.initexmf.clone(),
        }
    }
}

impl<R: CommandRunner> TexLocator for KpseLocator<R> {
    fn system_root(&self) -> Result<PathBuf> {
        discover::find_tex_root(&self.runner, &self.kpsewhich, self.platform.host)
    }

    fn user_root(&self) -> Result<PathBuf> {
        discover::find_tex_user(&self.runner, &self.initexmf, self.platform.distribution)
    }
}

/// Resolves the install tree once and hands out the same answer afterwards.
pub struct TexContext<L> {
    locator: L,
    root: OnceCell<PathBuf>,
}

impl<L: TexLocator> TexContext<L> {
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            root: OnceCell::new(),
        }
    }

    /// A context whose tree is fixed up front; the locator is never asked.
    pub fn with_root(locator: L, root: impl Into<PathBuf>) -> Self {
        Self {
            locator,
            root: OnceCell::from(root.into()),
        }
    }

    pub fn find_tex(&self) -> Result<&Path> {
        if let Some(root) = self.root.get() {
            return Ok(root);
        }
        let root = self.discover()?;
        Ok(self.root.get_or_init(|| root))
    }

    fn discover(&self) -> Result<PathBuf> {
        let mut tried = Vec::new();

        let system = self.locator.system_root()?;
        if self.locator.is_writable(&system) {
            info!(root = %system.display(), "installing into system TeX tree");
            return Ok(system);
        }
        debug!(root = %system.display(), "system TeX tree not writable");
        tried.push(system);

        let user = self.locator.user_root()?;
        if self.locator.is_writable(&user) {
            info!(root = %user.display(), "installing into user TeX tree");
            return Ok(user);
        }
        debug!(root = %user.display(), "user TeX tree not writable");
        tried.push(user);

        bail!(StyleError::NoWritableTexTree { tried })
    }
}
