//! Project root resolution and the resolved path set.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::environment::EnvironmentDescriptor;
use crate::platform::Platform;
use crate::settings::{BootstrapSettings, SETTINGS_FILE_NAME};

/// Environment variable the CLI reads for the project root.
pub const ROOT_ENV: &str = "FLUORITE_ROOT";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// The resolved root is not a directory.
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}

/// Resolve the project root.
///
/// Uses `explicit` (the `--root` flag, which the CLI parser also fills from
/// `FLUORITE_ROOT`) or falls back to the current working directory.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, PathError> {
    let raw = match explicit {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?,
    };

    if raw.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }

    let absolute = if raw.is_absolute() {
        raw
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(raw))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))?
    };

    if absolute.exists() && !absolute.is_dir() {
        return Err(PathError::NotADirectory(absolute));
    }

    Ok(absolute)
}

/// All paths the bootstrapper touches, resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub root: PathBuf,
    pub settings_file: PathBuf,
    pub environment: PathBuf,
    pub activation_script: PathBuf,
    pub interpreter: PathBuf,
    pub marker: PathBuf,
    pub manifest: PathBuf,
    pub entry_point: PathBuf,
}

impl ResolvedPaths {
    pub fn resolve(root: &Path, settings: &BootstrapSettings, platform: Platform) -> Self {
        let env = EnvironmentDescriptor::new(root.join(&settings.environment_dir), platform);
        Self {
            root: root.to_path_buf(),
            settings_file: root.join(SETTINGS_FILE_NAME),
            environment: env.path().to_path_buf(),
            activation_script: env.activation_script(),
            interpreter: env.python_path(),
            marker: env.marker_path(),
            manifest: root.join(&settings.manifest),
            entry_point: root.join(&settings.entry_point),
        }
    }
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "root = {}", self.root.display())?;
        writeln!(f, "settings_file = {}", self.settings_file.display())?;
        writeln!(f, "environment = {}", self.environment.display())?;
        writeln!(f, "activation_script = {}", self.activation_script.display())?;
        writeln!(f, "interpreter = {}", self.interpreter.display())?;
        writeln!(f, "marker = {}", self.marker.display())?;
        writeln!(f, "manifest = {}", self.manifest.display())?;
        write!(f, "entry_point = {}", self.entry_point.display())
    }
}
