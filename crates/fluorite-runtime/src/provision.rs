//! Environment provisioning: creation, stale-environment removal, package
//! manager invocations inside an activated environment.

use std::io;
use std::path::Path;

use fluorite_core::environment::{ActivatedEnvironment, EnvironmentDescriptor};
use fluorite_core::error::{BootstrapError, BootstrapResult};
use fluorite_core::launch_env::{EnvChanges, ProcessEnv};
use fluorite_core::ports::{Clock, CommandRunner, CommandSpec, DirRemover};
use fluorite_core::settings::RetrySettings;
use tracing::{debug, info, warn};

use crate::tooling::PythonRuntime;

/// Remove `path` with a bounded retry-with-backoff loop.
///
/// Sleeps between attempts only, starting at the initial delay and
/// doubling up to the maximum. A directory that is already gone counts as
/// removed. Returns the number of attempts used.
pub async fn remove_with_backoff(
    remover: &dyn DirRemover,
    clock: &dyn Clock,
    retry: &RetrySettings,
    path: &Path,
) -> BootstrapResult<u32> {
    let mut delay = retry.initial_delay();

    for attempt in 1..=retry.max_attempts {
        match remover.remove_dir_all(path) {
            Ok(()) => {
                debug!(path = %path.display(), attempt, "Removed environment directory");
                return Ok(attempt);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(attempt),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    attempt,
                    max_attempts = retry.max_attempts,
                    error = %e,
                    "Failed to remove environment directory"
                );
                if attempt < retry.max_attempts {
                    clock.sleep(delay).await;
                    delay = retry.next_delay(delay);
                }
            }
        }
    }

    Err(BootstrapError::StaleEnvironmentUnremovable {
        path: path.to_path_buf(),
        attempts: retry.max_attempts,
    })
}

/// Child-environment changes that deactivate `env` if it is active in `base`.
pub fn deactivation_changes(env: &EnvironmentDescriptor, base: &ProcessEnv) -> EnvChanges {
    let deactivated = env.deactivate(base);
    let mut changes = EnvChanges::new();

    if base.get("VIRTUAL_ENV").is_some() && deactivated.get("VIRTUAL_ENV").is_none() {
        changes = changes.without_var("VIRTUAL_ENV");
    }
    if let Some(path) = deactivated.get("PATH")
        && base.get("PATH") != Some(path)
    {
        changes = changes.with_var("PATH", path);
    }

    changes
}

/// Create the environment with `<python> -m venv <dir>`.
pub async fn create_environment(
    runner: &dyn CommandRunner,
    runtime: &PythonRuntime,
    env: &EnvironmentDescriptor,
    changes: &EnvChanges,
) -> BootstrapResult<()> {
    info!(path = %env.path().display(), "Creating Python environment");

    let spec = runtime
        .command(["-m", "venv"])
        .arg(env.path())
        .env_changes(changes);

    let failure = |reason: String| BootstrapError::ProvisioningFailure {
        path: env.path().to_path_buf(),
        reason,
    };

    let status = runner.status(&spec).await.map_err(|e| failure(e.to_string()))?;
    if !status.success() {
        return Err(failure(format!("{spec} exited with {status}")));
    }

    Ok(())
}

/// `<env python> -m pip <args...>` inside the activated environment.
pub fn pip_command<I, S>(activated: &ActivatedEnvironment, args: I) -> CommandSpec
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    CommandSpec::new(activated.python())
        .args(["-m", "pip"])
        .args(args)
        .env_changes(activated.changes())
}

/// Run a pip command, mapping any failure to `DependencyInstallFailure`.
pub async fn run_pip(runner: &dyn CommandRunner, spec: &CommandSpec) -> BootstrapResult<()> {
    let status = runner
        .status(spec)
        .await
        .map_err(|e| BootstrapError::DependencyInstallFailure {
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(BootstrapError::DependencyInstallFailure {
            reason: format!("{spec} exited with {status}"),
        });
    }

    Ok(())
}
