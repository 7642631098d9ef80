//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Project root and settings resolution (via fluorite-core)
//! - Process runner, clock and filesystem adapters (via fluorite-runtime)
//!
//! Command handlers receive the composed [`CliContext`].

use std::path::{Path, PathBuf};

use fluorite_core::launch_env::ProcessEnv;
use fluorite_core::paths::resolve_root;
use fluorite_core::platform::Platform;
use fluorite_core::settings::{BootstrapSettings, NO_PAUSE_ENV, is_truthy};
use fluorite_runtime::BootstrapDeps;
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Project root.
    pub root: PathBuf,
    /// `--no-pause` was given.
    pub no_pause: bool,
}

impl CliConfig {
    /// Resolve the project root from the parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Ok(Self {
            root: resolve_root(cli.root.as_deref())?,
            no_pause: cli.no_pause,
        })
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub root: PathBuf,
    /// Settings after file, environment and flag layering.
    pub settings: BootstrapSettings,
    pub platform: Platform,
    /// Snapshot of the process environment taken at startup.
    pub env: ProcessEnv,
    pub deps: BootstrapDeps,
}

impl CliContext {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Load `<root>/.env`, capture the environment and layer settings.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let dotenv = config.root.join(".env");
    if dotenv.is_file() {
        dotenvy::from_path(&dotenv).map_err(anyhow::Error::from)?;
        debug!(path = %dotenv.display(), "Loaded environment file");
    }

    let env = ProcessEnv::capture();
    let mut settings = BootstrapSettings::load(&config.root, &env)
        .map_err(fluorite_core::BootstrapError::from)?;
    if config.no_pause {
        settings.pause_on_exit = false;
    }

    Ok(CliContext {
        root: config.root,
        settings,
        platform: Platform::current(),
        env,
        deps: BootstrapDeps::system(),
    })
}

/// Pause policy before settings are known.
///
/// Used when bootstrapping itself fails, so the diagnostic still stays
/// on screen on platforms that pause by default.
pub fn fallback_pause(cli: &Cli) -> bool {
    let disabled_by_env = std::env::var(NO_PAUSE_ENV).is_ok_and(|v| is_truthy(&v));
    BootstrapSettings::default().pause_on_exit && !cli.no_pause && !disabled_by_env
}
