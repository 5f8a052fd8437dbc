//! Subprocess boundary
//!
//! The runner never touches `std::process` directly. It describes each step as a [`CommandLine`] and hands it to a
//! [`ProcessExecutor`], which lets tests script exit codes without a compiler on the machine.

use std::fmt;
use std::io;
use std::process::{Command, Stdio};

/// A program plus its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
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
}

/// Space-joined form used in `[CMD]` log lines.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of one finished subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationResult {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl InvocationResult {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Exit code zero is the only success.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a command to completion.
///
/// Implementations must block until the process exits. An `Err` means the process could not be started at all.
pub trait ProcessExecutor {
    fn execute(&mut self, command: &CommandLine) -> io::Result<InvocationResult>;
}

/// Spawns real processes with inherited stdio, so program output streams straight to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn execute(&mut self, command: &CommandLine) -> io::Result<InvocationResult> {
        tracing::debug!(program = %command.program, args = ?command.args, "spawning");

        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        tracing::debug!(program = %command.program, code = ?status.code(), "process exited");
        Ok(InvocationResult { code: status.code() })
    }
}
