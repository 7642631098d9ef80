//! Install command handler.

use fluorite_core::settings::StaleEnvironmentPolicy;
use fluorite_runtime::{InstallReport, Installer};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_field, print_step, print_success, print_warning};

/// Execute the install command.
///
/// `recreate` forces the recreate policy for an existing environment,
/// overriding settings and environment.
pub async fn execute(ctx: &CliContext, recreate: bool) -> Result<(), CliError> {
    let mut settings = ctx.settings.clone();
    if recreate {
        settings.stale_environment = StaleEnvironmentPolicy::Recreate;
    }

    print_step("Installing Fluorite...");

    let installer = Installer::new(
        ctx.root(),
        settings,
        ctx.platform,
        ctx.env.clone(),
        ctx.deps.clone(),
    );
    let report = installer.run().await?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &InstallReport) {
    println!();
    for warning in &report.warnings {
        print_warning(warning);
    }

    print_field(
        "Python",
        report.python_version.as_deref().unwrap_or("Unknown"),
    );
    print_field("Environment", report.environment.display());
    if report.recreated {
        print_field("Recreated", "yes");
    }
    if report.dependencies_installed {
        print_field("Dependencies", report.manifest_entries.len());
    }

    println!();
    print_success("Installation complete. Run `fluorite launch` to start the game.");
}
