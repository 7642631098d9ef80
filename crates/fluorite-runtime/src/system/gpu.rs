//! OpenGL capability probe.

use fluorite_core::graphics::GraphicsInfo;
use fluorite_core::ports::{CommandRunner, CommandSpec};
use fluorite_core::settings::GraphicsSettings;
use tracing::debug;

/// Run the configured probe (`glxinfo -B` by default) and parse its output.
///
/// Returns `None` when the probe cannot run or exits unsuccessfully.
pub async fn probe_graphics(
    runner: &dyn CommandRunner,
    settings: &GraphicsSettings,
) -> Option<GraphicsInfo> {
    let (program, args) = settings.probe_command.split_first()?;
    let spec = CommandSpec::new(program).args(args);

    match runner.output(&spec).await {
        Ok(output) if output.status.success() => Some(GraphicsInfo::parse(&output.stdout)),
        Ok(output) => {
            debug!(command = %spec, status = %output.status, "Graphics probe failed");
            None
        }
        Err(e) => {
            debug!(command = %spec, error = %e, "Graphics probe could not run");
            None
        }
    }
}
