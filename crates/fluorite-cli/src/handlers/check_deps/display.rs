//! Display utilities for dependency status output.

use fluorite_core::graphics::GraphicsInfo;
use fluorite_core::system::{Dependency, DependencyStatus};

use crate::presentation::{BOLD, GREEN, RED, RESET, YELLOW};

/// Print a single dependency row in the status table.
pub fn print_dependency(dep: &Dependency) {
    let status_str = match &dep.status {
        DependencyStatus::Present { version } => {
            if version.is_empty() {
                format!("{GREEN}✓ installed{RESET}")
            } else {
                format!("{GREEN}✓ {version}{RESET}")
            }
        }
        DependencyStatus::Missing => format!("{RED}✗ missing{RESET}"),
    };

    println!("{:<20} {status_str:<25} {}", dep.name, dep.description);
}

/// Print OpenGL detection status against the required major version.
pub fn print_graphics_status(info: Option<&GraphicsInfo>, min_major: u32) {
    let Some(info) = info else {
        return;
    };

    println!("\n{BOLD}OpenGL:{RESET}");
    println!("{}", "-".repeat(40));
    println!("  Vendor:   {}", info.vendor_or_unknown());
    println!("  Renderer: {}", info.renderer_or_unknown());
    println!("  Version:  {}", info.version_or_unknown());

    match info.major_version() {
        Some(major) if major >= min_major => {
            println!("  {GREEN}✓ OpenGL {major}.x meets the {min_major}.0 minimum{RESET}");
        }
        Some(major) => {
            println!("  {RED}✗ OpenGL {major}.x is below the {min_major}.0 minimum{RESET}");
        }
        None => println!("  {YELLOW}○ OpenGL version could not be determined{RESET}"),
    }
}
