//! Launch command handler.

use fluorite_runtime::{Launcher, PreparedLaunch};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_field, print_step, print_success, print_warning};

/// Execute the launch command.
///
/// A non-zero game exit comes back as an error carrying the game's code,
/// which becomes this process's exit code.
pub async fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let launcher = Launcher::new(
        ctx.root(),
        ctx.settings.clone(),
        ctx.platform,
        ctx.env.clone(),
        ctx.deps.runner.clone(),
    );

    let prepared = launcher.prepare().await?;
    print_diagnostics(&prepared);

    print_step("Starting game...");
    launcher.handoff(&prepared).await?;

    print_success("The game exited successfully");
    Ok(())
}

fn print_diagnostics(prepared: &PreparedLaunch) {
    for warning in prepared.warnings() {
        print_warning(warning);
    }

    print_field("Python", prepared.python_version());
    print_field("Environment", prepared.environment().display());

    if let Some(library) = prepared.launch_environment().preloaded_library() {
        print_field("Preloaded library", library.display());
    }

    if let Some(graphics) = prepared.graphics() {
        print_field("OpenGL vendor", graphics.vendor_or_unknown());
        print_field("OpenGL renderer", graphics.renderer_or_unknown());
        print_field("OpenGL version", graphics.version_or_unknown());
    }
    println!();
}
