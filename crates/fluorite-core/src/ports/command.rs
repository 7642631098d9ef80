//! Command runner port.
//!
//! Every external tool (interpreter, package manager, system package
//! manager, graphics probe, the game itself) is invoked through
//! [`CommandRunner`] using a [`CommandSpec`] value.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::launch_env::EnvChanges;

/// Errors raised before a command produced an exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be found.
    #[error("{program} not found")]
    NotFound { program: String },

    /// The program exists but could not be started.
    #[error("Failed to start {program}: {reason}")]
    SpawnFailed { program: String, reason: String },
}

impl CommandError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Exit status of a finished command.
///
/// `None` means the process was terminated without an exit code
/// (e.g. by a signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatusCode(pub Option<i32>);

impl ExitStatusCode {
    pub const SUCCESS: Self = Self(Some(0));

    pub const fn from_code(code: i32) -> Self {
        Self(Some(code))
    }

    pub const fn success(self) -> bool {
        matches!(self.0, Some(0))
    }

    /// Code to report as our own status; signal termination counts as 1.
    pub const fn code(self) -> i32 {
        match self.0 {
            Some(code) => code,
            None => 1,
        }
    }
}

impl fmt::Display for ExitStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: ExitStatusCode,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: ExitStatusCode::SUCCESS,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: ExitStatusCode::from_code(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stdout, or stderr when stdout is blank (some tools print versions there).
    pub fn text(&self) -> &str {
        if self.stdout.trim().is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }

    /// First non-empty line of [`CommandOutput::text`].
    pub fn first_line(&self) -> Option<&str> {
        self.text()
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Description of a command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: OsString,
    args: Vec<OsString>,
    env: EnvChanges,
    current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            env: EnvChanges::new(),
            current_dir: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Layer environment changes onto the command.
    #[must_use]
    pub fn env_changes(mut self, changes: &EnvChanges) -> Self {
        self.env = self.env.merged(changes);
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub const fn env(&self) -> &EnvChanges {
        &self.env
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Program name for diagnostics.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs commands described by [`CommandSpec`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion, capturing stdout and stderr.
    async fn output(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;

    /// Run to completion with inherited stdio, returning only the status.
    async fn status(&self, spec: &CommandSpec) -> Result<ExitStatusCode, CommandError>;
}
