//! Command runner backed by `tokio::process`.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use fluorite_core::ports::{CommandError, CommandOutput, CommandRunner, CommandSpec, ExitStatusCode};
use tokio::process::Command;
use tracing::debug;

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub const fn new() -> Self {
        Self
    }

    fn build(spec: &CommandSpec) -> Result<Command, CommandError> {
        let program = resolve_program(spec)?;
        let mut cmd = Command::new(program);
        cmd.args(spec.arguments());

        for key in spec.env().removed() {
            cmd.env_remove(key);
        }
        for (key, value) in spec.env().vars() {
            cmd.env(key, value);
        }
        if let Some(dir) = spec.working_dir() {
            cmd.current_dir(dir);
        }

        Ok(cmd)
    }
}

/// Resolve bare program names on `PATH`; explicit paths are used as-is.
fn resolve_program(spec: &CommandSpec) -> Result<PathBuf, CommandError> {
    let program = Path::new(spec.program());
    if program.components().count() > 1 || program.is_absolute() {
        return Ok(program.to_path_buf());
    }

    which::which(program).map_err(|_| CommandError::NotFound {
        program: spec.program_name(),
    })
}

fn spawn_error(spec: &CommandSpec, err: &io::Error) -> CommandError {
    if err.kind() == io::ErrorKind::NotFound {
        CommandError::NotFound {
            program: spec.program_name(),
        }
    } else {
        CommandError::SpawnFailed {
            program: spec.program_name(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn output(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        debug!(command = %spec, "Running command (captured)");

        let output = Self::build(spec)?
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| spawn_error(spec, &e))?;

        Ok(CommandOutput {
            status: ExitStatusCode(output.status.code()),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn status(&self, spec: &CommandSpec) -> Result<ExitStatusCode, CommandError> {
        debug!(command = %spec, "Running command (inherited stdio)");

        let status = Self::build(spec)?
            .status()
            .await
            .map_err(|e| spawn_error(spec, &e))?;

        Ok(ExitStatusCode(status.code()))
    }
}
