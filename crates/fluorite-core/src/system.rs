//! System dependency types used by the dependency report.

/// Represents the status of a system dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    /// Dependency is installed and available.
    Present { version: String },
    /// Dependency is missing.
    Missing,
}

/// Information about a system dependency.
///
/// Every entry in the report is needed by `install`; a missing one fails
/// the check.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Name of the dependency (e.g., "python", "glxinfo").
    pub name: String,
    /// Current status of the dependency.
    pub status: DependencyStatus,
    /// Description of what this dependency is used for.
    pub description: String,
    /// Installation instructions or hints.
    pub install_hint: Option<String>,
}

impl Dependency {
    /// Create a dependency, missing until a status is set.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DependencyStatus::Missing,
            description: description.into(),
            install_hint: None,
        }
    }

    /// Set installation hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.install_hint = Some(hint.into());
        self
    }

    /// Set the status of this dependency.
    #[must_use]
    pub fn with_status(mut self, status: DependencyStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the status from an optional detected version.
    #[must_use]
    pub fn with_version(self, version: Option<String>) -> Self {
        let status = version.map_or(DependencyStatus::Missing, |version| {
            DependencyStatus::Present { version }
        });
        self.with_status(status)
    }

    /// Whether the dependency is not installed.
    pub const fn is_missing(&self) -> bool {
        matches!(self.status, DependencyStatus::Missing)
    }
}
