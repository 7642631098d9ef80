//! Bootstrap error taxonomy.
//!
//! Every fatal condition of the installer and launcher is a distinct
//! variant. The user-facing message is derived from the variant, and the
//! process exit code is derived from it as well.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ports::CommandError;
use crate::settings::SettingsError;

/// Errors raised by the install and launch orchestrations.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A required tool (runtime or package manager) could not be invoked.
    #[error("{tool} was not found. Please install {tool} and make sure it is on your PATH.")]
    ToolingMissing { tool: String },

    /// Required system packages are absent and remediation did not run cleanly.
    #[error(
        "Required system packages could not be installed automatically: {}. \
         Install them with your system package manager.",
        .packages.join(", ")
    )]
    SystemPackageMissing { packages: Vec<String> },

    /// The probed OpenGL major version is below the minimum.
    #[error(
        "OpenGL {minimum}.0 or newer is required, {}. Please update your graphics drivers.",
        describe_detected(.detected)
    )]
    GraphicsCapabilityInsufficient { detected: Option<u32>, minimum: u32 },

    /// The environment could not be created.
    #[error("Failed to create the environment at {}: {reason}", .path.display())]
    ProvisioningFailure { path: PathBuf, reason: String },

    /// An existing environment could not be removed before recreation.
    #[error(
        "Could not remove the existing environment at {} after {attempts} attempts. \
         Close any programs that are using it and try again.",
        .path.display()
    )]
    StaleEnvironmentUnremovable { path: PathBuf, attempts: u32 },

    /// The package manager failed to upgrade itself or install the manifest.
    #[error("Failed to install dependencies: {reason}")]
    DependencyInstallFailure { reason: String },

    /// The environment is absent (or has no activation entry point).
    #[error(
        "Environment not found at {}. Please run `fluorite install` first.",
        .path.display()
    )]
    EnvironmentMissing { path: PathBuf },

    /// The known-good system copy of a native library could not be found.
    #[error(
        "Required library {name} was not found (searched: {}). \
         Install your distribution's runtime libraries and try again.",
        join_paths(.searched)
    )]
    RequiredLibraryNotFound { name: String, searched: Vec<PathBuf> },

    /// The program to hand off to does not exist.
    #[error("Entry point not found at {}", .path.display())]
    EntryPointMissing { path: PathBuf },

    /// The interpreter exists but the operating system refused to start it.
    #[error(
        "Could not start {}: {source}. Check the file's permissions and that it \
         matches this machine's architecture.",
        .program.display()
    )]
    ExternalProgramStartFailure {
        program: PathBuf,
        #[source]
        source: CommandError,
    },

    /// The external program terminated with a non-zero status.
    #[error("The game exited with an error (exit code {code})")]
    ExternalProgramNonZeroExit { code: i32 },

    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl BootstrapError {
    /// Process exit code for this error.
    ///
    /// Every orchestration failure maps to 1; a non-zero exit of the
    /// external program is mirrored as-is.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalProgramNonZeroExit { code } => *code,
            _ => 1,
        }
    }

    /// Shorthand for [`BootstrapError::ToolingMissing`].
    pub fn tooling_missing(tool: impl Into<String>) -> Self {
        Self::ToolingMissing { tool: tool.into() }
    }

    /// Shorthand for [`BootstrapError::EnvironmentMissing`].
    pub fn environment_missing(path: &Path) -> Self {
        Self::EnvironmentMissing {
            path: path.to_path_buf(),
        }
    }
}

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

fn describe_detected(detected: &Option<u32>) -> String {
    match detected {
        Some(major) => format!("but version {major}.x was detected"),
        None => "but the OpenGL version could not be detected".to_string(),
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
