//! Tool invocation and version extraction.
//!
//! These functions run a tool through the [`CommandRunner`] port and pull a
//! version number out of its first line of output.

use fluorite_core::ports::{CommandRunner, CommandSpec};
use tracing::debug;

/// First line printed by `spec`, if it ran and exited successfully.
pub async fn command_version(runner: &dyn CommandRunner, spec: &CommandSpec) -> Option<String> {
    match runner.output(spec).await {
        Ok(output) if output.status.success() => output.first_line().map(str::to_string),
        Ok(output) => {
            debug!(command = %spec, status = %output.status, "Version query failed");
            None
        }
        Err(e) => {
            debug!(command = %spec, error = %e, "Version query could not run");
            None
        }
    }
}

/// Whether `spec` runs and exits successfully.
pub async fn command_succeeds(runner: &dyn CommandRunner, spec: &CommandSpec) -> bool {
    runner
        .output(spec)
        .await
        .is_ok_and(|output| output.status.success())
}

/// `"Python 3.11.4"` -> `"3.11.4"`.
pub fn parse_python_version(line: &str) -> Option<String> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(name), Some(version)) if name.eq_ignore_ascii_case("python") => {
            Some(version.to_string())
        }
        _ => None,
    }
}

/// `"pip 23.2.1 from /usr/lib/python3/dist-packages/pip (python 3.11)"` -> `"23.2.1"`.
pub fn parse_pip_version(line: &str) -> Option<String> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("pip"), Some(version)) => Some(version.to_string()),
        _ => None,
    }
}

/// `"Version: 1.2.3-1ubuntu1"` line out of `dpkg -s` output.
pub fn parse_dpkg_version(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("Version:"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
