//! System package checks and bulk remediation (Debian family).

use fluorite_core::ports::{CommandRunner, CommandSpec};
use fluorite_core::settings::SystemPackageSettings;
use tracing::{debug, info};

use super::commands::parse_dpkg_version;

fn query_spec(settings: &SystemPackageSettings, package: &str) -> Option<CommandSpec> {
    let (program, args) = settings.query_command.split_first()?;
    Some(CommandSpec::new(program).args(args).arg(package))
}

/// Installed version of `package`, or `None` when it is not installed.
pub async fn installed_version(
    runner: &dyn CommandRunner,
    settings: &SystemPackageSettings,
    package: &str,
) -> Option<String> {
    let spec = query_spec(settings, package)?;
    match runner.output(&spec).await {
        Ok(output) if output.status.success() => {
            Some(parse_dpkg_version(&output.stdout).unwrap_or_else(|| "installed".to_string()))
        }
        Ok(_) => None,
        Err(e) => {
            debug!(package, error = %e, "Package query could not run");
            None
        }
    }
}

/// First configured package that is not installed.
///
/// Checking stops at the first miss: remediation installs the full set.
pub async fn first_missing(
    runner: &dyn CommandRunner,
    settings: &SystemPackageSettings,
) -> Option<String> {
    for package in &settings.packages {
        if installed_version(runner, settings, package).await.is_none() {
            debug!(package = %package, "System package missing");
            return Some(package.clone());
        }
    }
    None
}

/// Run one bulk install covering every configured package.
///
/// Returns a human-readable reason when the install did not complete.
pub async fn install_all(
    runner: &dyn CommandRunner,
    settings: &SystemPackageSettings,
) -> Result<(), String> {
    let Some((program, args)) = settings.install_command.split_first() else {
        return Err("no install command configured".to_string());
    };
    let spec = CommandSpec::new(program)
        .args(args)
        .args(&settings.packages);

    info!(command = %spec, "Installing system packages");
    match runner.status(&spec).await {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("{spec} exited with {status}")),
        Err(e) => Err(e.to_string()),
    }
}
