//! Install marker recording what was installed into an environment.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker file written into the environment after a successful install.
pub const MARKER_FILE_NAME: &str = ".fluorite-env.json";

/// Record of a completed install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvMarker {
    /// Version of the bootstrapper that performed the install.
    pub tool_version: String,
    /// Python version the environment was created with.
    pub python_version: String,
    /// Manifest entries installed, in manifest order.
    pub requirements: Vec<String>,
    pub installed_at: DateTime<Utc>,
}

impl EnvMarker {
    pub fn new(
        tool_version: impl Into<String>,
        python_version: impl Into<String>,
        requirements: Vec<String>,
    ) -> Self {
        Self {
            tool_version: tool_version.into(),
            python_version: python_version.into(),
            requirements,
            installed_at: Utc::now(),
        }
    }

    /// Read the marker at `path`. Absent or unreadable markers yield `None`.
    pub fn read(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, content)
    }

    /// Whether the installed requirements match `requirements`.
    pub fn matches(&self, requirements: &[String]) -> bool {
        self.requirements == requirements
    }
}
