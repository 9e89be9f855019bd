//! Scripted [`CommandRunner`] double used by the unit tests.

use crate::cmd::{CmdOutput, CommandRunner, Invocation};
use crate::error::{InfraError, Result};
use std::cell::RefCell;
use std::io;

enum Reply {
    Output(CmdOutput),
    /// The program could not be started, as when it is not installed.
    NotFound,
}

struct Rule {
    prefix: String,
    reply: Reply,
    once: bool,
}

/// Answers invocations by matching the start of their command line.
///
/// Rules are checked in insertion order; `once` rules are consumed on first
/// match. Unmatched invocations succeed with empty output. Every invocation
/// is recorded.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, prefix: &str, output: CmdOutput) -> Self {
        self.push(prefix, Reply::Output(output), false)
    }

    pub fn once(self, prefix: &str, output: CmdOutput) -> Self {
        self.push(prefix, Reply::Output(output), true)
    }

    pub fn fail(self, prefix: &str) -> Self {
        self.on(prefix, failed(""))
    }

    /// Matching invocations fail to start with [`InfraError::Spawn`].
    pub fn spawn_error(self, prefix: &str) -> Self {
        self.push(prefix, Reply::NotFound, false)
    }

    fn push(self, prefix: &str, reply: Reply, once: bool) -> Self {
        self.rules.borrow_mut().push(Rule {
            prefix: prefix.to_string(),
            reply,
            once,
        });
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Invocation::command_line).collect()
    }

    /// Position of the first recorded call starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.command_lines().iter().position(|c| c.starts_with(prefix))
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.command_lines()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CmdOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.command_line();
        let mut rules = self.rules.borrow_mut();
        let reply = match rules.iter().position(|r| line.starts_with(&r.prefix)) {
            Some(i) if rules[i].once => rules.remove(i).reply,
            Some(i) => match &rules[i].reply {
                Reply::Output(output) => Reply::Output(output.clone()),
                Reply::NotFound => Reply::NotFound,
            },
            None => Reply::Output(ok("")),
        };
        match reply {
            Reply::Output(output) => Ok(output),
            Reply::NotFound => Err(InfraError::Spawn {
                command: line,
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }
}

pub fn ok(stdout: &str) -> CmdOutput {
    CmdOutput {
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn failed(stderr: &str) -> CmdOutput {
    CmdOutput {
        code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}
