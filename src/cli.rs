//! Command-line front end shared by the binaries.

use anyhow::{bail, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::builder::StyleBuilder;
use crate::config::{Config, LOG_ENV, TEX_ROOT_ENV};
use crate::platform::Platform;
use crate::preflight;
use crate::process::{CommandRunner, SystemRunner};
use crate::tex::{KpseLocator, TexContext, TexLocator};

pub const ALPHA_WARNING: &str = "
WARNING: This installer is still in alpha, and is provided
         as a convenience only. That said, this installer
         may cause you to say unkind words in frustration
         instead of providing the intended convenience.
";

pub fn usage() -> &'static str {
    "Usage:
------

style-builder tds
    Builds a *.tds.zip file for this package.

style-builder install
    Installs this package into the main TeX directory.
    May require administrator privileges.

style-builder ctan
    Builds the *.tds.zip and a *.zip ready for CTAN submission."
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tds,
    Install,
    Ctan,
}

impl Command {
    /// Parse the arguments after the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        match args {
            [command] => match command.as_str() {
                "tds" => Ok(Command::Tds),
                "install" => Ok(Command::Install),
                "ctan" => Ok(Command::Ctan),
                other => bail!(
                    "No such command '{}', try either 'tds', 'install' or 'ctan'.\n\n{}",
                    other,
                    usage()
                ),
            },
            _ => bail!(usage()),
        }
    }
}

/// Install the stderr log subscriber, filtered by `STYLE_BUILDER_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Run `command` on the package in `work_dir` with the real toolchain.
pub fn run(command: Command, work_dir: &Path, platform: Platform) -> Result<()> {
    let config = Config::load(work_dir)?;
    debug!(package = %config.package, ?command, ?platform, "starting");

    preflight::check_host_tools(command, &config.tools, platform)?;

    let builder = StyleBuilder::new(&config, work_dir, SystemRunner, platform);
    let locator = KpseLocator::new(SystemRunner, platform, &config.tools);
    let tex = match env::var_os(TEX_ROOT_ENV) {
        Some(root) if !root.is_empty() => TexContext::with_root(locator, PathBuf::from(root)),
        _ => TexContext::new(locator),
    };

    execute(command, &builder, &tex)
}

/// The pipeline itself: always compile, then the subcommand's step.
pub fn execute<R: CommandRunner, L: TexLocator>(
    command: Command,
    builder: &StyleBuilder<R>,
    tex: &TexContext<L>,
) -> Result<()> {
    builder.build_style()?.build_doc()?;

    match command {
        Command::Tds => {
            builder.build_tds_archive()?;
        }
        Command::Install => {
            builder.install(tex)?;
        }
        Command::Ctan => {
            builder.build_tds_archive()?.build_ctan_archive()?;
        }
    }

    Ok(())
}
