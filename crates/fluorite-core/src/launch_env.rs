//! Process environment snapshots and immutable child-environment changes.
//!
//! The bootstrapper never mutates its own environment block. It captures a
//! [`ProcessEnv`] once, derives [`EnvChanges`] from it, and hands those
//! changes to every child command it spawns.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::settings::NativeLibrarySettings;

/// Read-only snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnv {
    vars: BTreeMap<String, String>,
}

impl ProcessEnv {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of `key`, treating an empty string as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Snapshot with an activated environment rooted at `root` stripped out.
    ///
    /// Removes `VIRTUAL_ENV` when it points at `root` and drops `bin_dir`
    /// from `PATH`, which is what a shell `deactivate` does.
    #[must_use]
    pub fn deactivated(&self, root: &Path, bin_dir: &Path, separator: char) -> Self {
        let mut vars = self.vars.clone();

        if vars
            .get("VIRTUAL_ENV")
            .is_some_and(|active| Path::new(active) == root)
        {
            vars.remove("VIRTUAL_ENV");
        }

        if let Some(path) = vars.get("PATH") {
            let kept: Vec<&str> = path
                .split(separator)
                .filter(|entry| Path::new(entry) != bin_dir)
                .collect();
            let joined = kept.join(&separator.to_string());
            vars.insert("PATH".to_string(), joined);
        }

        Self { vars }
    }
}

/// Immutable description of how a child environment differs from ours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvChanges {
    set: BTreeMap<String, String>,
    removed: BTreeSet<String>,
}

impl EnvChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` in the child.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.removed.remove(&key);
        self.set.insert(key, value.into());
        self
    }

    /// Remove `key` from the child.
    #[must_use]
    pub fn without_var(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.set.remove(&key);
        self.removed.insert(key);
        self
    }

    /// Layer `other` on top of `self`; `other` wins on conflicts.
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        for key in &other.removed {
            self.set.remove(key);
            self.removed.insert(key.clone());
        }
        for (key, value) in &other.set {
            self.removed.remove(key);
            self.set.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.set.get(key).map(String::as_str)
    }

    pub fn is_removed(&self, key: &str) -> bool {
        self.removed.contains(key)
    }

    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.set.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.removed.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.removed.is_empty()
    }
}

/// Library-loading overrides computed once for the game process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchEnvironment {
    changes: EnvChanges,
    foreign_prefix: Option<PathBuf>,
    preloaded_library: Option<PathBuf>,
}

impl LaunchEnvironment {
    /// No overrides at all.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Prefix of a foreign environment manager the process runs inside, if any.
    pub fn detect_foreign_prefix(
        env: &ProcessEnv,
        settings: &NativeLibrarySettings,
    ) -> Option<PathBuf> {
        env.get_non_empty(&settings.marker_var).map(PathBuf::from)
    }

    /// Overrides that clear the shadowing search path (inside a foreign
    /// manager) and force `library` to be preloaded.
    pub fn remediated(
        settings: &NativeLibrarySettings,
        foreign_prefix: Option<PathBuf>,
        library: PathBuf,
    ) -> Self {
        let mut changes = EnvChanges::new();
        if foreign_prefix.is_some() {
            changes = changes.without_var(settings.search_path_var.clone());
        }
        changes = changes.with_var(
            settings.preload_var.clone(),
            library.to_string_lossy().into_owned(),
        );

        Self {
            changes,
            foreign_prefix,
            preloaded_library: Some(library),
        }
    }

    pub const fn changes(&self) -> &EnvChanges {
        &self.changes
    }

    pub fn foreign_prefix(&self) -> Option<&Path> {
        self.foreign_prefix.as_deref()
    }

    pub fn preloaded_library(&self) -> Option<&Path> {
        self.preloaded_library.as_deref()
    }
}
