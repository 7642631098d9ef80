//! Bootstrap settings.
//!
//! Settings are resolved in layers: built-in defaults, then an optional
//! `fluorite.json` at the project root, then environment variables. CLI
//! flags are applied on top by the adapter.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::launch_env::ProcessEnv;

/// File name of the optional settings file at the project root.
pub const SETTINGS_FILE_NAME: &str = "fluorite.json";

/// Environment variable selecting the stale environment policy.
pub const STALE_POLICY_ENV: &str = "FLUORITE_STALE_ENV_POLICY";

/// Environment variable disabling the exit pause.
pub const NO_PAUSE_ENV: &str = "FLUORITE_NO_PAUSE";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse settings file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// What the installer does when the environment directory already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleEnvironmentPolicy {
    /// Keep and reuse the existing environment.
    #[default]
    Reuse,
    /// Tear the existing environment down and create a fresh one.
    Recreate,
}

impl std::str::FromStr for StaleEnvironmentPolicy {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reuse" => Ok(Self::Reuse),
            "recreate" => Ok(Self::Recreate),
            other => Err(SettingsError::Invalid {
                field: "stale_environment",
                reason: format!("expected `reuse` or `recreate`, got `{other}`"),
            }),
        }
    }
}

/// OpenGL capability requirements (Linux).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    /// Minimum accepted OpenGL major version.
    pub min_major_version: u32,
    /// Command printing the OpenGL vendor/renderer/version strings.
    pub probe_command: Vec<String>,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            min_major_version: 3,
            probe_command: vec!["glxinfo".to_string(), "-B".to_string()],
        }
    }
}

/// System package remediation (Linux).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemPackageSettings {
    /// Packages that must be installed.
    pub packages: Vec<String>,
    /// Command that exits 0 when the appended package is installed.
    pub query_command: Vec<String>,
    /// Command that installs all appended packages at once.
    pub install_command: Vec<String>,
}

impl Default for SystemPackageSettings {
    fn default() -> Self {
        Self {
            packages: ["python3", "python3-pip", "python3-venv", "mesa-utils", "libgl1"]
                .into_iter()
                .map(String::from)
                .collect(),
            query_command: vec!["dpkg".to_string(), "-s".to_string()],
            install_command: ["sudo", "apt-get", "install", "-y"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Native library conflict remediation (Linux).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeLibrarySettings {
    /// File name of the library to preload; `None` disables remediation.
    pub library: Option<String>,
    /// Directories searched, in order, for the library.
    pub search_roots: Vec<PathBuf>,
    /// Maximum directory depth below each root.
    pub max_depth: usize,
    /// Variable whose presence marks a foreign environment manager.
    pub marker_var: String,
    /// Library search-path variable cleared inside a foreign manager.
    pub search_path_var: String,
    /// Library preload variable set to the located file.
    pub preload_var: String,
}

impl Default for NativeLibrarySettings {
    fn default() -> Self {
        Self {
            library: Some("libstdc++.so.6".to_string()),
            search_roots: ["/usr/lib/x86_64-linux-gnu", "/usr/lib64", "/usr/lib", "/lib"]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            max_depth: 3,
            marker_var: "CONDA_PREFIX".to_string(),
            search_path_var: "LD_LIBRARY_PATH".to_string(),
            preload_var: "LD_PRELOAD".to_string(),
        }
    }
}

/// Bounded retry-with-backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 200,
            max_delay_ms: 2_000,
        }
    }
}

impl RetrySettings {
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Delay following `current`: doubled, capped at the maximum.
    pub fn next_delay(&self, current: Duration) -> Duration {
        std::cmp::min(current * 2, Duration::from_millis(self.max_delay_ms))
    }
}

/// All settings driving the install and launch flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    /// Environment directory, relative to the project root.
    pub environment_dir: PathBuf,
    /// Dependency manifest, relative to the project root.
    pub manifest: PathBuf,
    /// Program handed off to by the launcher, relative to the project root.
    pub entry_point: PathBuf,
    pub stale_environment: StaleEnvironmentPolicy,
    /// Require the activation entry point, not just the directory.
    pub strict_environment_check: bool,
    pub graphics: GraphicsSettings,
    pub system_packages: SystemPackageSettings,
    pub native_library: NativeLibrarySettings,
    /// Schedule for removing a stale environment directory.
    pub removal: RetrySettings,
    /// Wait for a key press before exiting an interactive terminal.
    pub pause_on_exit: bool,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            environment_dir: PathBuf::from("venv"),
            manifest: PathBuf::from("requirements.txt"),
            entry_point: PathBuf::from("src").join("main.py"),
            stale_environment: StaleEnvironmentPolicy::default(),
            strict_environment_check: true,
            graphics: GraphicsSettings::default(),
            system_packages: SystemPackageSettings::default(),
            native_library: NativeLibrarySettings::default(),
            removal: RetrySettings::default(),
            pause_on_exit: cfg!(target_os = "windows"),
        }
    }
}

impl BootstrapSettings {
    /// Load settings for the project at `root`.
    ///
    /// Missing settings file means defaults; environment overrides from
    /// `env` are applied afterwards and the result is validated.
    pub fn load(root: &Path, env: &ProcessEnv) -> Result<Self, SettingsError> {
        let path = root.join(SETTINGS_FILE_NAME);
        let settings = if path.exists() {
            debug!(path = %path.display(), "Loading settings file");
            let content = std::fs::read_to_string(&path).map_err(|e| SettingsError::Read {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            Self::from_json(&content).map_err(|e| SettingsError::Parse {
                path: path.clone(),
                reason: e.to_string(),
            })?
        } else {
            Self::default()
        };

        let settings = settings.with_env_overrides(env)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from JSON, filling unspecified fields with defaults.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Apply `FLUORITE_*` environment overrides.
    pub fn with_env_overrides(mut self, env: &ProcessEnv) -> Result<Self, SettingsError> {
        if let Some(policy) = env.get_non_empty(STALE_POLICY_ENV) {
            self.stale_environment = policy.parse()?;
        }
        if let Some(flag) = env.get_non_empty(NO_PAUSE_ENV)
            && is_truthy(flag)
        {
            self.pause_on_exit = false;
        }
        Ok(self)
    }

    /// Reject settings that cannot drive a meaningful run.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.environment_dir.as_os_str().is_empty() {
            return Err(SettingsError::Invalid {
                field: "environment_dir",
                reason: "must not be empty".to_string(),
            });
        }
        if self.entry_point.as_os_str().is_empty() {
            return Err(SettingsError::Invalid {
                field: "entry_point",
                reason: "must not be empty".to_string(),
            });
        }
        if self.removal.max_attempts == 0 {
            return Err(SettingsError::Invalid {
                field: "removal.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.removal.initial_delay_ms > self.removal.max_delay_ms {
            return Err(SettingsError::Invalid {
                field: "removal.initial_delay_ms",
                reason: "must not exceed removal.max_delay_ms".to_string(),
            });
        }
        if self.graphics.probe_command.is_empty() {
            return Err(SettingsError::Invalid {
                field: "graphics.probe_command",
                reason: "must name a program".to_string(),
            });
        }
        if self.system_packages.query_command.is_empty()
            || self.system_packages.install_command.is_empty()
        {
            return Err(SettingsError::Invalid {
                field: "system_packages",
                reason: "query_command and install_command must name a program".to_string(),
            });
        }
        Ok(())
    }
}

pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
