//! Checked subprocess invocation.
//!
//! The original deploy flow shelled out and ignored every exit status. Here
//! each invocation is described up front by a [`CommandSpec`] and executed
//! through the [`ProcessRunner`] trait, which returns an error as soon as a
//! command cannot be spawned or exits non-zero. The trait seam also lets
//! tests record invocations instead of running real tools.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{DeployError, DeployResult};
use crate::pipeline::Stage;

/// A fully described external command invocation.
///
/// Environment variables are scoped to the one child process; nothing here
/// mutates the deploy process's own environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    /// Working directory for the child; inherits ours when `None`
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// One-line rendering for progress output.
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Executes pipeline commands.
pub trait ProcessRunner {
    /// Run the command to completion, failing on spawn errors and non-zero
    /// exits. The stage tags any resulting error.
    fn run(&mut self, stage: Stage, spec: &CommandSpec) -> DeployResult<()>;
}

/// Runs commands on the local system with inherited stdio, so build and
/// transfer output (including ssh password prompts) reaches the terminal.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, stage: Stage, spec: &CommandSpec) -> DeployResult<()> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        for (key, value) in &spec.envs {
            cmd.env(key, value);
        }
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        let status = cmd
            .status()
            .map_err(|source| DeployError::Spawn { stage, source })?;

        if !status.success() {
            return Err(match status.code() {
                Some(code) => DeployError::StageFailed { stage, code },
                None => DeployError::StageKilled { stage },
            });
        }

        Ok(())
    }
}
