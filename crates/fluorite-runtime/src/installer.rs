//! Install flow: produce a ready-to-use environment populated from the
//! dependency manifest.
//!
//! Steps run sequentially and the first fatal condition aborts the run:
//!
//! 1. tooling check (runtime, then package manager)
//! 2. system package check with one bulk remediation (Linux)
//! 3. graphics capability validation (Linux)
//! 4. environment provisioning, honouring the stale-environment policy
//! 5. activation
//! 6. package manager self-upgrade
//! 7. manifest installation (skipped with a warning when absent)
//! 8. install marker

use std::path::{Path, PathBuf};

use fluorite_core::environment::{ActivatedEnvironment, EnvMarker, EnvironmentDescriptor};
use fluorite_core::error::{BootstrapError, BootstrapResult};
use fluorite_core::launch_env::ProcessEnv;
use fluorite_core::manifest::DependencyManifest;
use fluorite_core::platform::Platform;
use fluorite_core::settings::{BootstrapSettings, StaleEnvironmentPolicy};
use tracing::{debug, info, warn};

use crate::BootstrapDeps;
use crate::provision::{
    create_environment, deactivation_changes, pip_command, remove_with_backoff, run_pip,
};
use crate::system::{gpu, packages};
use crate::tooling::{PythonRuntime, check_pip, locate_runtime};

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Version of the runtime that created the environment.
    pub python_version: Option<String>,
    /// Environment directory.
    pub environment: PathBuf,
    /// Manifest entries, empty when no manifest was found.
    pub manifest_entries: Vec<String>,
    /// Whether the manifest was installed.
    pub dependencies_installed: bool,
    /// Whether an existing environment was removed and created again.
    pub recreated: bool,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<String>,
}

/// Runs the install flow against a project root.
pub struct Installer {
    root: PathBuf,
    settings: BootstrapSettings,
    platform: Platform,
    env: ProcessEnv,
    deps: BootstrapDeps,
    tool_version: String,
}

impl Installer {
    pub fn new(
        root: impl Into<PathBuf>,
        settings: BootstrapSettings,
        platform: Platform,
        env: ProcessEnv,
        deps: BootstrapDeps,
    ) -> Self {
        Self {
            root: root.into(),
            settings,
            platform,
            env,
            deps,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version recorded in the install marker.
    #[must_use]
    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = version.into();
        self
    }

    pub fn descriptor(&self) -> EnvironmentDescriptor {
        EnvironmentDescriptor::new(self.root.join(&self.settings.environment_dir), self.platform)
    }

    pub async fn run(&self) -> BootstrapResult<InstallReport> {
        let runner = self.deps.runner.as_ref();
        let mut warnings = Vec::new();

        let runtime = locate_runtime(runner, self.platform).await?;
        check_pip(runner, &runtime).await?;

        if self.platform.is_linux() {
            if let Some(warning) = self.ensure_system_packages().await {
                warnings.push(warning);
            }
            self.check_graphics().await?;
        }

        let descriptor = self.descriptor();
        let recreated = self.provision(&runtime, &descriptor).await?;

        let activated = descriptor
            .activate(&descriptor.deactivate(&self.env))
            .ok_or_else(|| BootstrapError::ProvisioningFailure {
                path: descriptor.path().to_path_buf(),
                reason: "the environment has no Python interpreter".to_string(),
            })?;
        debug!(python = %activated.python().display(), "Activated environment");

        info!("Upgrading pip inside the environment");
        run_pip(runner, &pip_command(&activated, ["install", "--upgrade", "pip"])).await?;

        let manifest_entries = self.install_manifest(&activated, &mut warnings).await?;
        let dependencies_installed = manifest_entries.is_some();
        let manifest_entries = manifest_entries.unwrap_or_default();

        let marker = EnvMarker::new(
            self.tool_version.clone(),
            runtime.version_or_unknown(),
            manifest_entries.clone(),
        );
        if let Err(e) = marker.write(&descriptor.marker_path()) {
            let warning = format!("Could not write install marker: {e}");
            warn!(path = %descriptor.marker_path().display(), "{warning}");
            warnings.push(warning);
        }

        Ok(InstallReport {
            python_version: runtime.version().map(str::to_string),
            environment: descriptor.path().to_path_buf(),
            manifest_entries,
            dependencies_installed,
            recreated,
            warnings,
        })
    }

    /// Check system packages; on the first missing one, bulk-install all.
    ///
    /// Never fatal: a failed remediation yields a warning.
    async fn ensure_system_packages(&self) -> Option<String> {
        let settings = &self.settings.system_packages;
        let runner = self.deps.runner.as_ref();

        let missing = packages::first_missing(runner, settings).await?;
        info!(package = %missing, "System package missing; installing the full set");

        match packages::install_all(runner, settings).await {
            Ok(()) => None,
            Err(reason) => {
                let err = BootstrapError::SystemPackageMissing {
                    packages: settings.packages.clone(),
                };
                warn!(reason = %reason, "{err}");
                Some(err.to_string())
            }
        }
    }

    async fn check_graphics(&self) -> BootstrapResult<()> {
        let graphics = &self.settings.graphics;
        let detected = gpu::probe_graphics(self.deps.runner.as_ref(), graphics)
            .await
            .and_then(|info| info.major_version());
        let minimum = graphics.min_major_version;

        match detected {
            Some(major) if major >= minimum => {
                info!(major, minimum, "OpenGL capability satisfied");
                Ok(())
            }
            _ => Err(BootstrapError::GraphicsCapabilityInsufficient { detected, minimum }),
        }
    }

    /// Make sure the environment exists. Returns whether it was recreated.
    async fn provision(
        &self,
        runtime: &PythonRuntime,
        descriptor: &EnvironmentDescriptor,
    ) -> BootstrapResult<bool> {
        let runner = self.deps.runner.as_ref();
        let changes = deactivation_changes(descriptor, &self.env);

        if !descriptor.exists() {
            create_environment(runner, runtime, descriptor, &changes).await?;
            return Ok(false);
        }

        match self.settings.stale_environment {
            StaleEnvironmentPolicy::Reuse if descriptor.is_valid() => {
                info!(path = %descriptor.path().display(), "Reusing existing environment");
                Ok(false)
            }
            StaleEnvironmentPolicy::Reuse => {
                warn!(
                    path = %descriptor.path().display(),
                    "Existing environment is incomplete; creating it in place"
                );
                create_environment(runner, runtime, descriptor, &changes).await?;
                Ok(false)
            }
            StaleEnvironmentPolicy::Recreate => {
                info!(path = %descriptor.path().display(), "Removing existing environment");
                remove_with_backoff(
                    self.deps.remover.as_ref(),
                    self.deps.clock.as_ref(),
                    &self.settings.removal,
                    descriptor.path(),
                )
                .await?;
                create_environment(runner, runtime, descriptor, &changes).await?;
                Ok(true)
            }
        }
    }

    /// Install the manifest. Returns its entries, or `None` when absent.
    async fn install_manifest(
        &self,
        activated: &ActivatedEnvironment,
        warnings: &mut Vec<String>,
    ) -> BootstrapResult<Option<Vec<String>>> {
        let path = self.root.join(&self.settings.manifest);
        let manifest = DependencyManifest::load(&path).map_err(|e| {
            BootstrapError::DependencyInstallFailure {
                reason: format!("cannot read {}: {e}", path.display()),
            }
        })?;

        let Some(manifest) = manifest else {
            let warning = manifest_missing_warning(&path);
            warn!("{warning}");
            warnings.push(warning);
            return Ok(None);
        };

        info!(
            path = %manifest.path().display(),
            entries = manifest.len(),
            "Installing dependencies"
        );
        let spec = pip_command(activated, ["install", "-r"])
            .arg(manifest.path())
            .current_dir(&self.root);
        run_pip(self.deps.runner.as_ref(), &spec).await?;

        Ok(Some(manifest.entries().to_vec()))
    }
}

fn manifest_missing_warning(path: &Path) -> String {
    format!(
        "{} not found; skipping dependency installation",
        path.display()
    )
}
