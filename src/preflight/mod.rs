//! Preflight checks for the TeX toolchain.
//!
//! Validates that the host has the tools a pipeline will shell out to before
//! any of them runs, so a missing `pdflatex` is reported up front instead of
//! after `latex` has already rewritten the style file.
//!
//! # Example
//!
//! ```rust
//! use style_builder::preflight::{command_exists, check_required_tools};
//!
//! if !command_exists("kpsewhich") {
//!     println!("no TeX installation on PATH");
//! }
//!
//! let tools = &[("latex", "texlive-latex-base"), ("pdflatex", "texlive-latex-base")];
//! if let Err(e) = check_required_tools(tools) {
//!     eprintln!("{}", e);
//! }
//! ```

use anyhow::{bail, Result};

use crate::cli::Command;
use crate::config::ToolNames;
use crate::platform::Platform;

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Check that specific tools are available.
///
/// Each tuple is (command_name, where_to_get_it). All missing tools are
/// reported in one error.
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let mut missing = Vec::new();

    for (tool, package) in tools {
        if !command_exists(tool) {
            missing.push((*tool, *package));
        }
    }

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, p)| format!("  {} (install: {})", t, p))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Missing required host tools:\n{}", msg);
    }

    Ok(())
}

/// Tools `command` will run on `platform`, with a hint where each comes from.
pub fn required_tools<'a>(
    command: Command,
    tools: &'a ToolNames,
    platform: Platform,
) -> Vec<(&'a str, &'static str)> {
    let distribution = if platform.is_miktex() {
        "MiKTeX"
    } else {
        "texlive-latex-base"
    };

    let mut required = vec![
        (tools.latex.as_str(), distribution),
        (tools.pdflatex.as_str(), distribution),
    ];
    if command == Command::Install {
        required.push((tools.kpsewhich.as_str(), distribution));
        if platform.is_miktex() {
            required.push((tools.initexmf.as_str(), "MiKTeX"));
        } else {
            required.push((tools.texhash.as_str(), "texlive-base"));
        }
    }
    required
}

/// Check everything [`required_tools`] lists.
pub fn check_host_tools(command: Command, tools: &ToolNames, platform: Platform) -> Result<()> {
    check_required_tools(&required_tools(command, tools, platform))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HostFamily;

    #[cfg(unix)]
    #[test]
    fn test_command_exists() {
        assert!(command_exists("sh"));
        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_required_tools_success() {
        let tools = &[("sh", "coreutils")];
        assert!(check_required_tools(tools).is_ok());
    }

    #[test]
    fn test_check_required_tools_lists_every_missing_tool() {
        let tools = &[
            ("nonexistent_command_xyz", "fake-package"),
            ("another_missing_tool_abc", "other-package"),
        ];
        let msg = check_required_tools(tools).unwrap_err().to_string();
        assert!(msg.contains("nonexistent_command_xyz (install: fake-package)"));
        assert!(msg.contains("another_missing_tool_abc (install: other-package)"));
    }

    #[test]
    fn test_required_tools_per_command() {
        let names = ToolNames::default();
        let unix = Platform::for_host(HostFamily::Unix);
        let windows = Platform::for_host(HostFamily::Windows);

        let tds: Vec<&str> = required_tools(Command::Tds, &names, unix)
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(tds, vec!["latex", "pdflatex"]);

        let install: Vec<&str> = required_tools(Command::Install, &names, unix)
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(install, vec!["latex", "pdflatex", "kpsewhich", "texhash"]);

        let install: Vec<&str> = required_tools(Command::Install, &names, windows)
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(install, vec!["latex", "pdflatex", "kpsewhich", "initexmf"]);
    }
}
