//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: it prints what handlers hand it.

use fluorite_core::error::BootstrapError;

use crate::error::CliError;

// ANSI color codes for better UX
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";

/// Print a step heading.
pub fn print_step(message: &str) {
    println!("{BOLD}{BLUE}{message}{RESET}");
}

pub fn print_success(message: &str) {
    println!("{GREEN}✓ {message}{RESET}");
}

pub fn print_warning(message: &str) {
    println!("{YELLOW}! {message}{RESET}");
}

/// Print a `label: value` diagnostic line.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {BOLD}{label:<18}{RESET} {value}");
}

/// Print the final diagnostic for a failed command to stderr.
pub fn print_error(err: &CliError) {
    match err {
        CliError::Bootstrap(BootstrapError::ExternalProgramNonZeroExit { .. }) => {
            eprintln!("{RED}✗ {err}{RESET}");
        }
        _ => eprintln!("{RED}{BOLD}Error:{RESET} {RED}{}{RESET}", format_error_chain(err)),
    }
}

/// Render an error and its sources on one line.
pub fn format_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
