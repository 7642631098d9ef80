//! System probe implementation for fluorite-runtime.
//!
//! This module provides the `DefaultSystemProbe` which implements
//! `SystemProbePort` from fluorite-core, plus the probing helpers the
//! install and launch flows share with it.

pub mod commands;
pub mod gpu;
pub mod library;
pub mod packages;

use std::sync::Arc;

use async_trait::async_trait;
use fluorite_core::graphics::GraphicsInfo;
use fluorite_core::platform::Platform;
use fluorite_core::ports::{CommandRunner, SystemProbePort};
use fluorite_core::settings::BootstrapSettings;
use fluorite_core::system::Dependency;

use crate::tooling::{PythonRuntime, check_pip, locate_runtime};

use commands::command_succeeds;

/// Default implementation of `SystemProbePort`.
///
/// Every probe goes through the injected [`CommandRunner`]. It should be
/// constructed in the CLI's composition root and passed to the
/// `check-deps` handler.
pub struct DefaultSystemProbe {
    runner: Arc<dyn CommandRunner>,
    settings: BootstrapSettings,
    platform: Platform,
}

impl DefaultSystemProbe {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        settings: BootstrapSettings,
        platform: Platform,
    ) -> Self {
        Self {
            runner,
            settings,
            platform,
        }
    }

    async fn check_python(&self) -> (Dependency, Option<PythonRuntime>) {
        let runtime = locate_runtime(self.runner.as_ref(), self.platform).await.ok();
        let dep = Dependency::new("python", "Runs the game and creates its environment")
            .with_hint("https://www.python.org/downloads/")
            .with_version(
                runtime
                    .as_ref()
                    .map(|r| r.version_or_unknown().to_string()),
            );
        (dep, runtime)
    }

    async fn check_pip(&self, runtime: Option<&PythonRuntime>) -> Dependency {
        let version = match runtime {
            Some(runtime) => check_pip(self.runner.as_ref(), runtime)
                .await
                .ok()
                .map(|v| v.unwrap_or_else(|| "installed".to_string())),
            None => None,
        };
        Dependency::new("pip", "Installs the game's Python dependencies")
            .with_hint(self.package_hint("python3-pip", "python -m ensurepip --upgrade"))
            .with_version(version)
    }

    async fn check_venv(&self, runtime: Option<&PythonRuntime>) -> Dependency {
        let available = match runtime {
            Some(runtime) => {
                command_succeeds(self.runner.as_ref(), &runtime.command(["-m", "venv", "--help"]))
                    .await
            }
            None => false,
        };
        Dependency::new("venv", "Creates the isolated game environment")
            .with_hint(self.package_hint("python3-venv", "reinstall Python with venv support"))
            .with_version(available.then(|| "available".to_string()))
    }

    async fn check_system_packages(&self) -> Vec<Dependency> {
        let settings = &self.settings.system_packages;
        let mut deps = Vec::with_capacity(settings.packages.len());
        for package in &settings.packages {
            let version =
                packages::installed_version(self.runner.as_ref(), settings, package).await;
            deps.push(
                Dependency::new(package.clone(), "System package")
                    .with_hint(format!("sudo apt-get install {package}"))
                    .with_version(version),
            );
        }
        deps
    }

    async fn check_graphics_probe(&self) -> Dependency {
        let graphics = &self.settings.graphics;
        let program = graphics
            .probe_command
            .first()
            .cloned()
            .unwrap_or_default();
        let version = gpu::probe_graphics(self.runner.as_ref(), graphics)
            .await
            .map(|info| info.version_or_unknown().to_string());

        Dependency::new(program, "Verifies OpenGL support during install")
            .with_hint("sudo apt-get install mesa-utils")
            .with_version(version)
    }

    fn package_hint(&self, package: &str, fallback: &str) -> String {
        if self.platform.is_linux() {
            format!("sudo apt-get install {package}")
        } else {
            fallback.to_string()
        }
    }
}

#[async_trait]
impl SystemProbePort for DefaultSystemProbe {
    async fn check_all_dependencies(&self) -> Vec<Dependency> {
        let (python, runtime) = self.check_python().await;
        let pip = self.check_pip(runtime.as_ref()).await;
        let venv = self.check_venv(runtime.as_ref()).await;

        let mut deps = vec![python, pip, venv];

        if self.platform.is_linux() {
            deps.extend(self.check_system_packages().await);
            deps.push(self.check_graphics_probe().await);
        }

        deps
    }

    async fn detect_graphics(&self) -> Option<GraphicsInfo> {
        if !self.platform.is_linux() {
            return None;
        }
        gpu::probe_graphics(self.runner.as_ref(), &self.settings.graphics).await
    }
}
