//! Runtime and package manager discovery.

use std::ffi::OsString;
use std::path::Path;

use fluorite_core::error::{BootstrapError, BootstrapResult};
use fluorite_core::platform::Platform;
use fluorite_core::ports::{CommandRunner, CommandSpec};
use tracing::{debug, info};

use crate::system::commands::{command_version, parse_pip_version, parse_python_version};

/// Tool name reported when no interpreter candidate works.
pub const PYTHON_TOOL: &str = "python";
/// Tool name reported when the package manager is unusable.
pub const PIP_TOOL: &str = "pip";

/// An invocable language runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonRuntime {
    program: OsString,
    version: Option<String>,
}

impl PythonRuntime {
    pub fn new(program: impl Into<OsString>, version: Option<String>) -> Self {
        Self {
            program: program.into(),
            version,
        }
    }

    /// Program used to invoke the runtime (a bare name or a path).
    pub fn program(&self) -> &Path {
        Path::new(&self.program)
    }

    /// Parsed version such as `3.11.4`, when the banner could be parsed.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Version for display, `Unknown` when unavailable.
    pub fn version_or_unknown(&self) -> &str {
        self.version().unwrap_or(fluorite_core::graphics::UNKNOWN)
    }

    /// `<python> <args...>`
    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        CommandSpec::new(&self.program).args(args)
    }
}

/// Locate the language runtime.
///
/// Candidates are tried in platform order (`python3`, then `python`);
/// the first whose `--version` succeeds wins.
pub async fn locate_runtime(
    runner: &dyn CommandRunner,
    platform: Platform,
) -> BootstrapResult<PythonRuntime> {
    for &candidate in platform.python_candidates() {
        let spec = CommandSpec::new(candidate).arg("--version");
        if let Some(banner) = command_version(runner, &spec).await {
            let runtime = PythonRuntime::new(candidate, parse_python_version(&banner));
            info!(
                program = candidate,
                version = runtime.version_or_unknown(),
                "Found Python runtime"
            );
            return Ok(runtime);
        }
        debug!(program = candidate, "Python candidate not usable");
    }

    Err(BootstrapError::tooling_missing(PYTHON_TOOL))
}

/// Verify the package manager is invocable through `runtime`.
///
/// Returns the pip version when it could be parsed.
pub async fn check_pip(
    runner: &dyn CommandRunner,
    runtime: &PythonRuntime,
) -> BootstrapResult<Option<String>> {
    let spec = runtime.command(["-m", "pip", "--version"]);
    let banner = command_version(runner, &spec)
        .await
        .ok_or_else(|| BootstrapError::tooling_missing(PIP_TOOL))?;

    let version = parse_pip_version(&banner);
    info!(version = version.as_deref().unwrap_or("unknown"), "Found pip");
    Ok(version)
}
