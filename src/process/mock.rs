//! Scripted [`CommandRunner`] that records what it was asked to run.

use super::{Cmd, CommandRunner};
use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// How a recorded command was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationKind {
    Confirming { confirmation: String },
    Output,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
    pub kind: InvocationKind,
}

#[derive(Debug, Clone)]
struct Response {
    success: bool,
    stdout: String,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            success: true,
            stdout: String::new(),
        }
    }
}

/// Answers every command from a per-program script. Programs without a
/// script succeed with empty output.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, Response>,
    transcript: RefCell<Vec<Invocation>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` report failure.
    pub fn fail(mut self, program: &str) -> Self {
        self.responses.entry(program.to_string()).or_default().success = false;
        self
    }

    /// Make `program` print `stdout`.
    pub fn stdout(mut self, program: &str, stdout: &str) -> Self {
        self.responses.entry(program.to_string()).or_default().stdout = stdout.to_string();
        self
    }

    /// Everything run so far, in order.
    pub fn transcript(&self) -> Vec<Invocation> {
        self.transcript.borrow().clone()
    }

    /// Programs run so far, in order.
    pub fn programs(&self) -> Vec<String> {
        self.transcript
            .borrow()
            .iter()
            .map(|inv| inv.program.clone())
            .collect()
    }

    fn record(&self, cmd: &Cmd, kind: InvocationKind) -> Response {
        self.transcript.borrow_mut().push(Invocation {
            program: cmd.program().to_string(),
            args: cmd.get_args().to_vec(),
            dir: cmd.dir().map(PathBuf::from),
            kind,
        });
        self.responses
            .get(cmd.program())
            .cloned()
            .unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run_confirming(&self, cmd: &Cmd, confirmation: &str) -> Result<bool> {
        let response = self.record(
            cmd,
            InvocationKind::Confirming {
                confirmation: confirmation.to_string(),
            },
        );
        Ok(response.success)
    }

    fn output(&self, cmd: &Cmd) -> Result<String> {
        let response = self.record(cmd, InvocationKind::Output);
        if !response.success {
            bail!("{}", cmd.failure_message());
        }
        Ok(response.stdout)
    }

    fn status(&self, cmd: &Cmd) -> Result<bool> {
        Ok(self.record(cmd, InvocationKind::Status).success)
    }
}
