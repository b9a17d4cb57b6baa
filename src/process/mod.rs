//! External tool invocation.
//!
//! Every shell-out in the crate goes through a [`CommandRunner`] so the
//! orchestration code can be exercised against [`mock::MockRunner`] without a
//! TeX installation.
//!
//! ```rust,ignore
//! use style_builder::process::{Cmd, CommandRunner, SystemRunner};
//!
//! let ok = SystemRunner.run_confirming(&Cmd::new("latex").arg("demo.ins"), "yes")?;
//! ```

pub mod mock;

use anyhow::{bail, Context, Result};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// A command line to run, plus the working directory to run it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    dir: Option<PathBuf>,
    error_msg: Option<String>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: None,
            error_msg: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Message used instead of the generic one when the command fails.
    pub fn error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn failure_message(&self) -> String {
        self.error_msg
            .clone()
            .unwrap_or_else(|| format!("`{}` failed", self))
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands. Every call blocks until the child exits.
pub trait CommandRunner {
    /// Run `cmd`, answering any prompt on its stdin with `confirmation`
    /// until it exits. Returns whether the exit status was success.
    fn run_confirming(&self, cmd: &Cmd, confirmation: &str) -> Result<bool>;

    /// Run `cmd` to completion and return its stdout.
    ///
    /// A non-zero exit is an error.
    fn output(&self, cmd: &Cmd) -> Result<String>;

    /// Run `cmd` with inherited stdio and report whether it succeeded.
    fn status(&self, cmd: &Cmd) -> Result<bool>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run_confirming(&self, cmd: &Cmd, confirmation: &str) -> Result<bool> {
        (**self).run_confirming(cmd, confirmation)
    }

    fn output(&self, cmd: &Cmd) -> Result<String> {
        (**self).output(cmd)
    }

    fn status(&self, cmd: &Cmd) -> Result<bool> {
        (**self).status(cmd)
    }
}

/// Spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_confirming(&self, cmd: &Cmd, confirmation: &str) -> Result<bool> {
        debug!(command = %cmd, confirmation, "running with auto-confirmation");

        let mut child = cmd
            .to_command()
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning `{}`", cmd))?;

        let line = format!("{}\n", confirmation);
        let mut stdin = child.stdin.take();

        let status = loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("polling `{}`", cmd))?
            {
                break status;
            }

            match stdin.as_mut() {
                Some(pipe) => {
                    // The child closed its end; stop feeding and just wait.
                    if pipe
                        .write_all(line.as_bytes())
                        .and_then(|()| pipe.flush())
                        .is_err()
                    {
                        stdin = None;
                    }
                }
                None => {
                    break child
                        .wait()
                        .with_context(|| format!("waiting for `{}`", cmd))?
                }
            }
        };

        debug!(command = %cmd, %status, "command exited");
        Ok(status.success())
    }

    fn output(&self, cmd: &Cmd) -> Result<String> {
        debug!(command = %cmd, "capturing output");

        let output = cmd
            .to_command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("running `{}`", cmd))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} (status {}): {}",
                cmd.failure_message(),
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn status(&self, cmd: &Cmd) -> Result<bool> {
        debug!(command = %cmd, "running");

        let status = cmd
            .to_command()
            .status()
            .with_context(|| format!("running `{}`", cmd))?;

        Ok(status.success())
    }
}
