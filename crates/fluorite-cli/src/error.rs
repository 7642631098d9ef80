//! CLI-specific error types and exit code mapping.

use fluorite_core::error::BootstrapError;
use fluorite_core::paths::PathError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// An install or launch step failed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// The project root could not be resolved.
    #[error("Invalid project root: {0}")]
    Path(#[from] PathError),

    /// Wiring failures (environment file, terminal I/O, dependency report).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Map error to the process exit code.
    ///
    /// Everything is 1 except a failed game, whose own code is mirrored.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Bootstrap(err) => err.exit_code(),
            Self::Path(_) | Self::Other(_) => 1,
        }
    }
}
