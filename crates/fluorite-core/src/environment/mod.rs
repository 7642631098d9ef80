//! The Environment Descriptor: an isolated Python environment on disk.
//!
//! A descriptor only knows the conventional layout of a virtual
//! environment. Activation computes the variables a child process needs
//! to resolve tools against the environment; the current process is left
//! untouched.

mod marker;

use std::path::{Path, PathBuf};

use crate::launch_env::{EnvChanges, ProcessEnv};
use crate::platform::Platform;

pub use marker::{EnvMarker, MARKER_FILE_NAME};

/// A filesystem-located isolated runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDescriptor {
    root: PathBuf,
    platform: Platform,
}

impl EnvironmentDescriptor {
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    /// Directory of the environment.
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Directory holding the environment's executables.
    pub fn bin_dir(&self) -> PathBuf {
        if self.platform.is_windows() {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    /// The activation entry point at its conventional sub-path.
    pub fn activation_script(&self) -> PathBuf {
        if self.platform.is_windows() {
            self.bin_dir().join("activate.bat")
        } else {
            self.bin_dir().join("activate")
        }
    }

    /// Interpreter inside the environment.
    pub fn python_path(&self) -> PathBuf {
        let bin = self.bin_dir();
        if self.platform.is_windows() {
            return bin.join("python.exe");
        }
        let python3 = bin.join("python3");
        if python3.exists() {
            python3
        } else {
            bin.join("python")
        }
    }

    /// Location of the install marker.
    pub fn marker_path(&self) -> PathBuf {
        self.root.join(MARKER_FILE_NAME)
    }

    /// Whether the environment directory exists.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Whether the directory and its activation entry point both exist.
    pub fn is_valid(&self) -> bool {
        self.exists() && self.activation_script().is_file()
    }

    /// The base environment with this environment deactivated.
    pub fn deactivate(&self, base: &ProcessEnv) -> ProcessEnv {
        base.deactivated(
            &self.root,
            &self.bin_dir(),
            self.platform.path_list_separator(),
        )
    }

    /// Activate the environment for child processes.
    ///
    /// Returns `None` when the environment has no interpreter.
    pub fn activate(&self, base: &ProcessEnv) -> Option<ActivatedEnvironment> {
        let python = self.python_path();
        if !python.is_file() {
            return None;
        }

        let bin = self.bin_dir();
        let separator = self.platform.path_list_separator();
        let path_value = match base.get_non_empty("PATH") {
            Some(existing) => format!("{}{separator}{existing}", bin.display()),
            None => bin.display().to_string(),
        };

        let changes = EnvChanges::new()
            .with_var("VIRTUAL_ENV", self.root.to_string_lossy().into_owned())
            .with_var("PATH", path_value)
            .without_var("PYTHONHOME");

        Some(ActivatedEnvironment {
            root: self.root.clone(),
            python,
            changes,
        })
    }
}

/// An environment made the resolution target for child processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedEnvironment {
    root: PathBuf,
    python: PathBuf,
    changes: EnvChanges,
}

impl ActivatedEnvironment {
    /// Identifying path of the environment.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Interpreter every in-environment command must use.
    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Variables applied to child processes.
    pub const fn changes(&self) -> &EnvChanges {
        &self.changes
    }
}
