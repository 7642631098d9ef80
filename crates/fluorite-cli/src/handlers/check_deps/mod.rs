//! Check system dependencies handler.
//!
//! This module handles checking for the tools and system packages the
//! install flow relies on and displaying them in a formatted table.

mod display;

use anyhow::{Result, bail};
use fluorite_core::ports::SystemProbePort;
use fluorite_core::system::Dependency;

use crate::presentation::{BLUE, BOLD, GREEN, RED, RESET};

use display::{print_dependency, print_graphics_status};

/// Execute the check-deps command.
///
/// Returns an error if any required dependency is missing.
pub async fn execute(probe: &dyn SystemProbePort, min_gl_major: u32) -> Result<()> {
    println!("{BOLD}{BLUE}Checking system dependencies...{RESET}\n");

    let dependencies = probe.check_all_dependencies().await;

    println!("{BOLD}{:<20} {:<15} {:<50}{RESET}", "DEPENDENCY", "STATUS", "NOTES");
    println!("{}", "=".repeat(85));

    for dep in &dependencies {
        print_dependency(dep);
    }

    print_graphics_status(probe.detect_graphics().await.as_ref(), min_gl_major);

    println!();
    println!("{}", "=".repeat(85));

    let missing: Vec<&Dependency> = dependencies.iter().filter(|d| d.is_missing()).collect();
    let present = dependencies.len() - missing.len();
    let total = dependencies.len();

    if missing.is_empty() {
        println!("{GREEN}✓ All required dependencies are installed!{RESET} ({present}/{total})");
        return Ok(());
    }

    println!(
        "{RED}✗ Missing {} required dependencies{RESET} ({present}/{total})",
        missing.len()
    );
    println!("\n{BOLD}To install missing dependencies:{RESET}");
    for dep in &missing {
        if let Some(hint) = &dep.install_hint {
            println!("  {:<14} {hint}", dep.name);
        }
    }

    bail!("{} required dependencies are missing", missing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fluorite_core::graphics::GraphicsInfo;

    struct StaticProbe(Vec<Dependency>);

    #[async_trait]
    impl SystemProbePort for StaticProbe {
        async fn check_all_dependencies(&self) -> Vec<Dependency> {
            self.0.clone()
        }

        async fn detect_graphics(&self) -> Option<GraphicsInfo> {
            None
        }
    }

    #[tokio::test]
    async fn test_all_present_passes() {
        let probe = StaticProbe(vec![
            Dependency::new("python", "Runs the game").with_version(Some("3.11.4".to_string())),
        ]);
        assert!(execute(&probe, 3).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_dependency_fails() {
        let probe = StaticProbe(vec![
            Dependency::new("python", "Runs the game").with_version(Some("3.11.4".to_string())),
            Dependency::new("libgl1", "System package").with_hint("sudo apt-get install libgl1"),
        ]);

        let err = execute(&probe, 3).await.unwrap_err();
        assert!(err.to_string().starts_with("1 required"));
    }
}
