//! Launch flow: validate the environment, remediate the native library
//! conflict, collect diagnostics and hand off to the game.
//!
//! [`Launcher::prepare`] performs every check and computes the child
//! environment once. [`Launcher::handoff`] runs the entry point with it and
//! mirrors the child's exit status.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fluorite_core::environment::{ActivatedEnvironment, EnvMarker, EnvironmentDescriptor};
use fluorite_core::error::{BootstrapError, BootstrapResult};
use fluorite_core::graphics::GraphicsInfo;
use fluorite_core::launch_env::{LaunchEnvironment, ProcessEnv};
use fluorite_core::manifest::DependencyManifest;
use fluorite_core::platform::Platform;
use fluorite_core::ports::{CommandRunner, CommandSpec};
use fluorite_core::settings::BootstrapSettings;
use tracing::{debug, info, warn};

use crate::system::gpu;
use crate::system::library::find_library;
use crate::tooling::{PythonRuntime, locate_runtime};

/// Everything needed to start the game, computed once.
#[derive(Debug, Clone)]
pub struct PreparedLaunch {
    runtime: PythonRuntime,
    activated: ActivatedEnvironment,
    launch_env: LaunchEnvironment,
    graphics: Option<GraphicsInfo>,
    entry_point: PathBuf,
    warnings: Vec<String>,
}

impl PreparedLaunch {
    /// Runtime version for display, `Unknown` when unavailable.
    pub fn python_version(&self) -> &str {
        self.runtime.version_or_unknown()
    }

    /// Path identifying the activated environment.
    pub fn environment(&self) -> &Path {
        self.activated.root()
    }

    pub const fn activated(&self) -> &ActivatedEnvironment {
        &self.activated
    }

    pub const fn launch_environment(&self) -> &LaunchEnvironment {
        &self.launch_env
    }

    /// GL diagnostics; present on Linux, fields default to `Unknown`.
    pub const fn graphics(&self) -> Option<&GraphicsInfo> {
        self.graphics.as_ref()
    }

    pub fn entry_point(&self) -> &Path {
        &self.entry_point
    }

    /// Non-fatal findings, such as a stale install marker.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The command that hands off to the game.
    pub fn command(&self, root: &Path) -> CommandSpec {
        CommandSpec::new(self.activated.python())
            .arg(&self.entry_point)
            .env_changes(self.activated.changes())
            .env_changes(self.launch_env.changes())
            .current_dir(root)
    }
}

/// Runs the launch flow against a project root.
pub struct Launcher {
    root: PathBuf,
    settings: BootstrapSettings,
    platform: Platform,
    env: ProcessEnv,
    runner: Arc<dyn CommandRunner>,
}

impl Launcher {
    pub fn new(
        root: impl Into<PathBuf>,
        settings: BootstrapSettings,
        platform: Platform,
        env: ProcessEnv,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            root: root.into(),
            settings,
            platform,
            env,
            runner,
        }
    }

    pub fn descriptor(&self) -> EnvironmentDescriptor {
        EnvironmentDescriptor::new(self.root.join(&self.settings.environment_dir), self.platform)
    }

    /// Run every check up to, but not including, the handoff.
    pub async fn prepare(&self) -> BootstrapResult<PreparedLaunch> {
        let runtime = locate_runtime(self.runner.as_ref(), self.platform).await?;

        let descriptor = self.descriptor();
        let present = if self.settings.strict_environment_check {
            descriptor.is_valid()
        } else {
            descriptor.exists()
        };
        if !present {
            return Err(BootstrapError::environment_missing(descriptor.path()));
        }

        let launch_env = self.launch_environment()?;

        let activated = descriptor
            .activate(&descriptor.deactivate(&self.env))
            .ok_or_else(|| BootstrapError::environment_missing(descriptor.path()))?;
        debug!(python = %activated.python().display(), "Activated environment");

        let graphics = if self.platform.is_linux() {
            Some(
                gpu::probe_graphics(self.runner.as_ref(), &self.settings.graphics)
                    .await
                    .unwrap_or_default(),
            )
        } else {
            None
        };

        let warnings = self.marker_warnings(&descriptor);
        for warning in &warnings {
            warn!("{warning}");
        }

        Ok(PreparedLaunch {
            runtime,
            activated,
            launch_env,
            graphics,
            entry_point: self.root.join(&self.settings.entry_point),
            warnings,
        })
    }

    /// Run the entry point and mirror its exit status.
    ///
    /// A non-zero exit is returned as
    /// [`BootstrapError::ExternalProgramNonZeroExit`] carrying the child's code.
    pub async fn handoff(&self, prepared: &PreparedLaunch) -> BootstrapResult<()> {
        if !prepared.entry_point().is_file() {
            return Err(BootstrapError::EntryPointMissing {
                path: prepared.entry_point().to_path_buf(),
            });
        }

        let spec = prepared.command(&self.root);
        info!(command = %spec, "Starting game");

        let status = self.runner.status(&spec).await.map_err(|e| {
            warn!(error = %e, "Could not start the environment's interpreter");
            if e.is_not_found() {
                BootstrapError::environment_missing(prepared.environment())
            } else {
                BootstrapError::ExternalProgramStartFailure {
                    program: prepared.activated().python().to_path_buf(),
                    source: e,
                }
            }
        })?;

        if status.success() {
            info!("Game exited normally");
            Ok(())
        } else {
            debug!(%status, "Game exited with an error");
            Err(BootstrapError::ExternalProgramNonZeroExit {
                code: status.code(),
            })
        }
    }

    /// Library-loading overrides for the game (Linux only).
    fn launch_environment(&self) -> BootstrapResult<LaunchEnvironment> {
        let settings = &self.settings.native_library;
        let Some(name) = settings.library.as_deref().filter(|_| self.platform.is_linux()) else {
            return Ok(LaunchEnvironment::passthrough());
        };

        let foreign_prefix = LaunchEnvironment::detect_foreign_prefix(&self.env, settings);
        if let Some(prefix) = &foreign_prefix {
            info!(
                prefix = %prefix.display(),
                cleared = %settings.search_path_var,
                "Foreign environment manager detected"
            );
        }

        let library = find_library(
            &settings.search_roots,
            name,
            settings.max_depth,
            foreign_prefix.as_deref(),
        )
        .ok_or_else(|| BootstrapError::RequiredLibraryNotFound {
            name: name.to_string(),
            searched: settings.search_roots.clone(),
        })?;
        info!(
            library = %library.display(),
            var = %settings.preload_var,
            "Preloading system library"
        );

        Ok(LaunchEnvironment::remediated(settings, foreign_prefix, library))
    }

    fn marker_warnings(&self, descriptor: &EnvironmentDescriptor) -> Vec<String> {
        let Some(marker) = EnvMarker::read(&descriptor.marker_path()) else {
            return vec![
                "No install record found for this environment; \
                 run `fluorite install` if the game fails to start"
                    .to_string(),
            ];
        };

        let manifest_path = self.root.join(&self.settings.manifest);
        let entries = match DependencyManifest::load(&manifest_path) {
            Ok(Some(manifest)) => manifest.entries().to_vec(),
            Ok(None) => Vec::new(),
            Err(e) => {
                debug!(path = %manifest_path.display(), error = %e, "Cannot read manifest");
                return Vec::new();
            }
        };

        if marker.matches(&entries) {
            Vec::new()
        } else {
            vec![format!(
                "{} changed since the last install; \
                 run `fluorite install` to update the environment",
                manifest_path.display()
            )]
        }
    }
}
