//! System probe port for the dependency report.

use async_trait::async_trait;

use crate::graphics::GraphicsInfo;
use crate::system::Dependency;

/// Port for probing tools, system packages and graphics capability.
///
/// # Example
///
/// ```ignore
/// use fluorite_core::ports::SystemProbePort;
///
/// async fn report(probe: &dyn SystemProbePort) {
///     let deps = probe.check_all_dependencies().await;
///     let gl = probe.detect_graphics().await;
///     // ...
/// }
/// ```
#[async_trait]
pub trait SystemProbePort: Send + Sync {
    /// Check every dependency the install flow relies on.
    async fn check_all_dependencies(&self) -> Vec<Dependency>;

    /// Query OpenGL vendor, renderer and version.
    ///
    /// Returns `None` when the probe command cannot be run.
    async fn detect_graphics(&self) -> Option<GraphicsInfo>;
}
