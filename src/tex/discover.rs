//! Locating TeX trees by asking the installed toolchain.

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

use crate::error::StyleError;
use crate::platform::{HostFamily, TexDistribution};
use crate::process::{Cmd, CommandRunner};

/// Class file every LaTeX installation ships under `tex/latex/base`.
pub const BASE_CLASS: &str = "article.cls";

/// Key in `initexmf --report` naming the per-user MikTeX tree.
pub const USER_INSTALL_KEY: &str = "UserInstall";

/// Directory levels between the tree root and [`BASE_CLASS`].
const BASE_CLASS_DEPTH: usize = 3;

/// Find the system-wide tree that holds the base LaTeX classes.
pub fn find_tex_root(
    runner: &impl CommandRunner,
    kpsewhich: &str,
    host: HostFamily,
) -> Result<PathBuf> {
    let output = runner.output(
        &Cmd::new(kpsewhich)
            .arg(BASE_CLASS)
            .error_msg(format!("{} could not locate {}", kpsewhich, BASE_CLASS)),
    )?;
    let root = tex_root_from_kpsewhich(&output, host)?;
    debug!(root = %root.display(), "system TeX tree");
    Ok(root)
}

/// Turn the path `kpsewhich` reports for [`BASE_CLASS`] into the tree root.
///
/// `kpsewhich` prints `/` separators on every host, so the path is split by
/// hand. On Windows that split strips the `\` from the drive, which is put
/// back here.
pub fn tex_root_from_kpsewhich(output: &str, host: HostFamily) -> Result<PathBuf> {
    let reported = output.trim();
    if reported.is_empty() {
        bail!("kpsewhich did not report a location for {}", BASE_CLASS);
    }

    let mut parts: Vec<&str> = reported.split('/').collect();
    parts.pop();
    if parts.len() <= BASE_CLASS_DEPTH {
        bail!(
            "'{}' is too shallow to sit under tex/latex/base in a TeX tree",
            reported
        );
    }
    let root_parts = &parts[..parts.len() - BASE_CLASS_DEPTH];

    let root = match host {
        HostFamily::Windows => {
            format!("{}\\{}", root_parts[0], root_parts[1..].join("\\"))
        }
        HostFamily::Unix | HostFamily::Unsupported => {
            let joined = root_parts.join("/");
            if joined.is_empty() {
                "/".to_string()
            } else {
                joined
            }
        }
    };
    Ok(PathBuf::from(root))
}

/// Find the per-user tree.
///
/// MikTeX reports it through `initexmf --report`; everywhere else it is
/// `~/texmf`.
pub fn find_tex_user(
    runner: &impl CommandRunner,
    initexmf: &str,
    distribution: TexDistribution,
) -> Result<PathBuf> {
    match distribution {
        TexDistribution::MikTex => {
            let report = runner.output(&Cmd::new(initexmf).arg("--report"))?;
            user_install_from_report(&report)
        }
        TexDistribution::TexLive => {
            let home = dirs::home_dir().context("could not determine the home directory")?;
            Ok(home.join("texmf"))
        }
    }
}

/// Parse `key: value` lines. Lines without a colon are skipped.
pub fn parse_report(report: &str) -> BTreeMap<String, String> {
    report
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

pub fn user_install_from_report(report: &str) -> Result<PathBuf> {
    match parse_report(report).remove(USER_INSTALL_KEY) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => bail!(StyleError::MissingConfigKey {
            key: USER_INSTALL_KEY.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::mock::{InvocationKind, MockRunner};

    #[test]
    fn test_tex_root_unix() {
        let root = tex_root_from_kpsewhich(
            "/usr/share/texlive/texmf-dist/tex/latex/base/article.cls\n",
            HostFamily::Unix,
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/usr/share/texlive/texmf-dist"));
    }

    #[test]
    fn test_tex_root_windows_reattaches_drive() {
        let root = tex_root_from_kpsewhich(
            "C:/texlive/2023/texmf-dist/tex/latex/base/article.cls\r\n",
            HostFamily::Windows,
        )
        .unwrap();
        assert_eq!(root, PathBuf::from(r"C:\texlive\2023\texmf-dist"));
    }

    #[test]
    fn test_tex_root_at_filesystem_root() {
        let root = tex_root_from_kpsewhich("/tex/latex/base/article.cls", HostFamily::Unix).unwrap();
        assert_eq!(root, PathBuf::from("/"));
    }

    #[test]
    fn test_tex_root_rejects_empty_and_shallow() {
        assert!(tex_root_from_kpsewhich("  \n", HostFamily::Unix).is_err());
        assert!(tex_root_from_kpsewhich("latex/base/article.cls", HostFamily::Unix).is_err());
    }

    #[test]
    fn test_find_tex_root_queries_kpsewhich() {
        let runner =
            MockRunner::new().stdout("kpsewhich", "/opt/texmf/tex/latex/base/article.cls\n");

        let root = find_tex_root(&runner, "kpsewhich", HostFamily::Unix).unwrap();

        assert_eq!(root, PathBuf::from("/opt/texmf"));
        let transcript = runner.transcript();
        assert_eq!(transcript[0].args, vec![BASE_CLASS.to_string()]);
        assert_eq!(transcript[0].kind, InvocationKind::Output);
    }

    #[test]
    fn test_user_install_from_report() {
        let report = "MiKTeX: 23.10\n\
                      OS: Windows 11\n\
                      UserInstall: C:\\Users\\ada\\AppData\\Roaming\\MiKTeX\n\
                      UserConfig: C:\\Users\\ada\\AppData\\Roaming\\MiKTeX\n";
        assert_eq!(
            user_install_from_report(report).unwrap(),
            PathBuf::from(r"C:\Users\ada\AppData\Roaming\MiKTeX")
        );
    }

    #[test]
    fn test_user_install_missing_key() {
        let err = user_install_from_report("MiKTeX: 23.10\nno colon here\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StyleError>(),
            Some(StyleError::MissingConfigKey { key }) if key == USER_INSTALL_KEY
        ));
    }

    #[test]
    fn test_find_tex_user_miktex_uses_initexmf() {
        let runner = MockRunner::new().stdout("initexmf", "UserInstall: D:\\tex\n");

        let dir = find_tex_user(&runner, "initexmf", TexDistribution::MikTex).unwrap();

        assert_eq!(dir, PathBuf::from("D:\\tex"));
        assert_eq!(runner.programs(), vec!["initexmf"]);
    }

    #[test]
    fn test_find_tex_user_texlive_is_home_texmf() {
        let runner = MockRunner::new();
        let dir = find_tex_user(&runner, "initexmf", TexDistribution::TexLive).unwrap();

        assert!(dir.ends_with("texmf"));
        assert!(runner.transcript().is_empty());
    }
}
