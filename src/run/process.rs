//! External process invocation

use crate::error::Result;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Command as StdCommand;
use tracing::debug;

/// A single external command: program and arguments
///
/// Arguments are kept as `OsString` so paths reach the child byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs external commands to completion and reports their exit code
///
/// Implementations block until the command finishes. A process killed by a
/// signal reports `-1`.
pub trait ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<i32>;
}

/// Runs commands as real child processes, inheriting stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<i32> {
        debug!(command = %invocation, "spawning");

        let status = StdCommand::new(&invocation.program)
            .args(&invocation.args)
            .status()?;
        Ok(status.code().unwrap_or(-1))
    }
}
