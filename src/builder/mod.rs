//! Building, packaging and installing a DocStrip style package.
//!
//! [`StyleBuilder`] drives the TeX toolchain over a package directory laid
//! out the usual way:
//!
//! ```text
//! <work_dir>/
//!     <pkg>.ins     DocStrip installer, `latex` turns it into <pkg>.sty
//!     <pkg>.dtx     literate source, `pdflatex` turns it into <pkg>.pdf
//!     README.md
//! ```
//!
//! Every step returns the builder so a pipeline reads top to bottom:
//!
//! ```rust,ignore
//! builder.build_style()?.build_doc()?.build_tds_archive()?;
//! ```

pub mod manifest;

pub use manifest::{CtanManifest, Manifest, PackageName};

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::archive::{archive_path, create_archive};
use crate::config::{Config, ToolNames};
use crate::error::StyleError;
use crate::platform::Platform;
use crate::process::{Cmd, CommandRunner};
use crate::tex::probe::mkdir_p;
use crate::tex::{TexContext, TexLocator};
use manifest::require_files;

/// Answer given to every prompt `latex` raises (DocStrip asks before
/// overwriting existing files).
pub const CONFIRMATION: &str = "yes";

pub struct StyleBuilder<R> {
    package: PackageName,
    work_dir: PathBuf,
    manifest: Manifest,
    ctan_manifest: CtanManifest,
    tools: ToolNames,
    runner: R,
    platform: Platform,
}

impl<R: CommandRunner> StyleBuilder<R> {
    pub fn new(config: &Config, work_dir: impl Into<PathBuf>, runner: R, platform: Platform) -> Self {
        Self {
            package: config.package.clone(),
            work_dir: work_dir.into(),
            manifest: Manifest::for_package(&config.package),
            ctan_manifest: CtanManifest::for_package(&config.package, &config.ctan_extra_files),
            tools: config.tools.clone(),
            runner,
            platform,
        }
    }

    /// Replace the CTAN file list.
    pub fn with_ctan_manifest(mut self, ctan_manifest: CtanManifest) -> Self {
        self.ctan_manifest = ctan_manifest;
        self
    }

    pub fn package(&self) -> &PackageName {
        &self.package
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn ctan_manifest(&self) -> &CtanManifest {
        &self.ctan_manifest
    }

    pub fn tds_archive_path(&self) -> PathBuf {
        self.work_dir.join(self.package.file("tds.zip"))
    }

    pub fn ctan_archive_path(&self) -> PathBuf {
        self.work_dir.join(self.package.file("zip"))
    }

    /// Run `latex` on `<pkg>.ins` to produce `<pkg>.sty`.
    pub fn build_style(&self) -> Result<&Self> {
        println!("Building: {}", self.package.file("sty"));
        self.compile(&self.tools.latex, self.package.file("ins"))?;
        println!();
        Ok(self)
    }

    /// Run `pdflatex` on `<pkg>.dtx` to produce `<pkg>.pdf`.
    pub fn build_doc(&self) -> Result<&Self> {
        println!("Building: {}", self.package.file("pdf"));
        self.compile(&self.tools.pdflatex, self.package.file("dtx"))?;
        println!();
        Ok(self)
    }

    fn compile(&self, tool: &str, source: String) -> Result<()> {
        require_files(&self.work_dir, [source.as_str()])?;

        let cmd = Cmd::new(tool).arg(source).current_dir(&self.work_dir);
        if !self.runner.run_confirming(&cmd, CONFIRMATION)? {
            bail!(StyleError::ToolFailed {
                command: cmd.to_string(),
            });
        }
        Ok(())
    }

    /// Pack the manifest into `<pkg>.tds.zip` using the TDS layout.
    pub fn build_tds_archive(&self) -> Result<&Self> {
        let output = self.tds_archive_path();
        println!("Building: {}", output.display());

        let sources = require_files(&self.work_dir, self.manifest.files())?;
        let mut entries = Vec::with_capacity(sources.len());
        for ((file, segments), source) in self.manifest.iter().zip(sources) {
            println!("\tPacking: {} ---> {}", file, archive_path(segments));
            let mut member = segments.to_vec();
            member.push(file.to_string());
            entries.push((source, archive_path(&member)));
        }

        create_archive(&output, &entries)
            .with_context(|| format!("building TDS archive '{}'", output.display()))?;
        println!();
        Ok(self)
    }

    /// Pack the CTAN file list into `<pkg>.zip`, everything under `<pkg>/`.
    pub fn build_ctan_archive(&self) -> Result<&Self> {
        let output = self.ctan_archive_path();
        println!("Building: {}", output.display());

        let files = self.ctan_manifest.files();
        let sources = require_files(&self.work_dir, files.iter().map(String::as_str))?;
        let mut entries = Vec::with_capacity(sources.len());
        for (file, source) in files.iter().zip(sources) {
            println!("\tPacking: {}", file);
            entries.push((source, archive_path(&[self.package.as_str(), file.as_str()])));
        }

        create_archive(&output, &entries)
            .with_context(|| format!("building CTAN archive '{}'", output.display()))?;
        println!();
        Ok(self)
    }

    /// Copy the manifest into the TeX tree chosen by `tex`, then refresh the
    /// filename database (except on MikTeX).
    pub fn install<L: TexLocator>(&self, tex: &TexContext<L>) -> Result<&Self> {
        let sources = require_files(&self.work_dir, self.manifest.files())?;
        let root = tex.find_tex()?;

        for ((file, segments), source) in self.manifest.iter().zip(sources) {
            let dest_dir = segments.iter().fold(root.to_path_buf(), |dir, s| dir.join(s));
            mkdir_p(&dest_dir)?;

            let dest = dest_dir.join(file);
            println!("Installing: {} ---> {}", source.display(), dest.display());
            fs::copy(&source, &dest).with_context(|| {
                format!("copying '{}' to '{}'", source.display(), dest.display())
            })?;
        }

        if !self.platform.is_miktex() {
            let cmd = Cmd::new(&self.tools.texhash);
            if !self.runner.status(&cmd)? {
                bail!(StyleError::ToolFailed {
                    command: cmd.to_string(),
                });
            }
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HostFamily;
    use crate::process::mock::{InvocationKind, MockRunner};
    use crate::tex::KpseLocator;
    use std::fs::File;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn demo_config() -> Config {
        Config {
            package: PackageName::new("demo").unwrap(),
            ..Config::default()
        }
    }

    fn unix() -> Platform {
        Platform::for_host(HostFamily::Unix)
    }

    fn write_files(dir: &Path, files: &[&str]) {
        for file in files {
            fs::write(dir.join(file), format!("contents of {}\r\n", file)).unwrap();
        }
    }

    fn member_names(archive: &Path) -> Vec<String> {
        let zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_build_style_runs_latex_on_ins() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &["demo.ins"]);
        let runner = MockRunner::new();
        let builder = StyleBuilder::new(&demo_config(), temp.path(), &runner, unix());

        builder.build_style().unwrap();

        let transcript = runner.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].program, "latex");
        assert_eq!(transcript[0].args, vec!["demo.ins".to_string()]);
        assert_eq!(transcript[0].dir.as_deref(), Some(temp.path()));
        assert_eq!(
            transcript[0].kind,
            InvocationKind::Confirming {
                confirmation: "yes".to_string()
            }
        );
    }

    #[test]
    fn test_failed_compile_aborts_pipeline() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &["demo.ins", "demo.dtx"]);
        let runner = MockRunner::new().fail("latex");
        let builder = StyleBuilder::new(&demo_config(), temp.path(), &runner, unix());

        let err = builder
            .build_style()
            .and_then(|b| b.build_doc())
            .map(|_| ())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StyleError>(),
            Some(StyleError::ToolFailed { command }) if command == "latex demo.ins"
        ));
        assert_eq!(runner.programs(), vec!["latex"]);
    }

    #[test]
    fn test_build_doc_missing_source() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let builder = StyleBuilder::new(&demo_config(), temp.path(), &runner, unix());

        let err = builder.build_doc().map(|_| ()).unwrap_err();

        assert!(matches!(err.downcast_ref::<StyleError>(), Some(StyleError::MissingFile(_))));
        assert!(runner.transcript().is_empty());
    }

    #[test]
    fn test_compile_steps_chain() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &["demo.ins", "demo.dtx"]);
        let runner = MockRunner::new().stdout("pdflatex", "");
        let builder = StyleBuilder::new(&demo_config(), temp.path(), &runner, unix());

        builder.build_style().unwrap().build_doc().unwrap();

        assert_eq!(runner.programs(), vec!["latex", "pdflatex"]);
        assert_eq!(runner.transcript()[1].args, vec!["demo.dtx".to_string()]);
    }

    #[test]
    fn test_tds_archive_layout() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &["demo.sty", "demo.pdf"]);
        let builder = StyleBuilder::new(&demo_config(), temp.path(), MockRunner::new(), unix());

        builder.build_tds_archive().unwrap();

        let archive = temp.path().join("demo.tds.zip");
        assert_eq!(
            member_names(&archive),
            vec!["doc/latex/demo/demo.pdf", "tex/latex/demo/demo.sty"]
        );
    }

    #[test]
    fn test_ctan_archive_missing_member() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &["demo.dtx", "demo.ins", "demo.pdf"]);
        let builder = StyleBuilder::new(&demo_config(), temp.path(), MockRunner::new(), unix());

        let err = builder.build_ctan_archive().map(|_| ()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StyleError>(),
            Some(StyleError::MissingFile(path)) if path.ends_with("demo.tds.zip")
        ));
        assert!(!temp.path().join("demo.zip").exists());
    }

    #[test]
    fn test_ctan_archive_nests_under_package() {
        let temp = TempDir::new().unwrap();
        write_files(
            temp.path(),
            &["demo.sty", "demo.pdf", "demo.dtx", "demo.ins", "README.md"],
        );
        let builder = StyleBuilder::new(&demo_config(), temp.path(), MockRunner::new(), unix());

        builder
            .build_tds_archive()
            .unwrap()
            .build_ctan_archive()
            .unwrap();

        assert_eq!(
            member_names(&temp.path().join("demo.zip")),
            vec![
                "demo/README.md",
                "demo/demo.dtx",
                "demo/demo.ins",
                "demo/demo.pdf",
                "demo/demo.tds.zip",
            ]
        );
    }

    #[test]
    fn test_custom_ctan_manifest() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &["demo.dtx"]);
        let builder = StyleBuilder::new(&demo_config(), temp.path(), MockRunner::new(), unix())
            .with_ctan_manifest(CtanManifest::from_files(vec!["demo.dtx".to_string()]));

        builder.build_ctan_archive().unwrap();

        assert_eq!(member_names(&temp.path().join("demo.zip")), vec!["demo/demo.dtx"]);
    }

    #[test]
    fn test_install_copies_and_refreshes() {
        let work = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write_files(work.path(), &["demo.sty", "demo.pdf"]);
        let runner = MockRunner::new();
        let builder = StyleBuilder::new(&demo_config(), work.path(), &runner, unix());
        let locator = KpseLocator::new(&runner, unix(), &ToolNames::default());
        let tex = TexContext::with_root(locator, tree.path());

        builder.install(&tex).unwrap();

        let sty = tree.path().join("tex/latex/demo/demo.sty");
        let pdf = tree.path().join("doc/latex/demo/demo.pdf");
        assert_eq!(fs::read_to_string(sty).unwrap(), "contents of demo.sty\r\n");
        assert!(pdf.is_file());
        assert_eq!(runner.programs(), vec!["texhash"]);
        assert_eq!(runner.transcript()[0].kind, InvocationKind::Status);
    }

    #[test]
    fn test_install_on_miktex_skips_texhash() {
        let work = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write_files(work.path(), &["demo.sty", "demo.pdf"]);
        let windows = Platform::for_host(HostFamily::Windows);
        let runner = MockRunner::new();
        let builder = StyleBuilder::new(&demo_config(), work.path(), &runner, windows);
        let tex = TexContext::with_root(
            KpseLocator::new(&runner, windows, &ToolNames::default()),
            tree.path(),
        );

        builder.install(&tex).unwrap();

        assert!(tree.path().join("tex/latex/demo/demo.sty").is_file());
        assert!(runner.transcript().is_empty());
    }

    #[test]
    fn test_install_missing_file_before_discovery() {
        let work = TempDir::new().unwrap();
        write_files(work.path(), &["demo.sty"]);
        let runner = MockRunner::new();
        let builder = StyleBuilder::new(&demo_config(), work.path(), &runner, unix());
        let tex = TexContext::new(KpseLocator::new(&runner, unix(), &ToolNames::default()));

        let err = builder.install(&tex).map(|_| ()).unwrap_err();

        assert!(matches!(err.downcast_ref::<StyleError>(), Some(StyleError::MissingFile(_))));
        assert!(runner.transcript().is_empty());
    }

    #[test]
    fn test_install_texhash_failure() {
        let work = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write_files(work.path(), &["demo.sty", "demo.pdf"]);
        let runner = MockRunner::new().fail("texhash");
        let builder = StyleBuilder::new(&demo_config(), work.path(), &runner, unix());
        let tex = TexContext::with_root(
            KpseLocator::new(&runner, unix(), &ToolNames::default()),
            tree.path(),
        );

        let err = builder.install(&tex).map(|_| ()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StyleError>(),
            Some(StyleError::ToolFailed { command }) if command == "texhash"
        ));
    }
}
