//! External command execution.
//!
//! Every call to `terraform`, `az` or a helper script goes through a
//! [`CommandRunner`]. Invocations carry their own working directory, the
//! process-wide current directory is never changed.

use crate::error::{InfraError, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A single external program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
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

    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Program and arguments joined by spaces, for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CmdOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, like a shell `2>&1`.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Turn a non-zero exit into [`InfraError::CommandFailed`].
    pub fn into_checked(self, invocation: &Invocation) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(InfraError::CommandFailed {
                command: invocation.command_line(),
                code: self.code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

pub trait CommandRunner {
    /// Run the invocation to completion. `Err` only when it could not be started.
    fn run(&self, invocation: &Invocation) -> Result<CmdOutput>;

    /// Run and require a zero exit status, returning stdout.
    fn run_checked(&self, invocation: &Invocation) -> Result<String> {
        self.run(invocation)?.into_checked(invocation)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CmdOutput> {
        let cmd = invocation.command_line();
        log::debug!("run({cmd}) in {:?}", invocation.cwd, cmd = cmd.on_blue());

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            log::error!("Command execution failed: {}", e);
            InfraError::Spawn {
                command: cmd.clone(),
                source: e,
            }
        })?;

        let result = CmdOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if output.status.success() {
            log::debug!("Success cmd: {cmd}");
            log::debug!("Success output.stdout.len(): {}", output.stdout.len());
        } else {
            log::trace!(
                "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
                code = output.status.code(),
                status = output.status,
                stderr = result.stderr.red()
            );
            log::warn!(
                "{failed} to run {cmd}",
                failed = "failed".on_red(),
                cmd = cmd.on_blue()
            );
        }

        Ok(result)
    }
}
