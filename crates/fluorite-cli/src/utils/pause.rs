//! Pause-for-acknowledgment before the process exits.
//!
//! A console window opened by double-clicking closes as soon as the
//! process ends; waiting for a key keeps the last diagnostic readable.

use anyhow::{Context, Result};
use console::Term;

/// Wait for a single key press when `enabled` and stdout is a terminal.
///
/// Returns whether a pause actually happened.
pub fn wait_for_key(enabled: bool) -> Result<bool> {
    if !enabled {
        return Ok(false);
    }

    let term = Term::stdout();
    if !term.is_term() {
        return Ok(false);
    }

    term.write_line("")
        .and_then(|()| term.write_line("Press any key to exit..."))
        .context("Failed to write pause prompt")?;
    term.read_key().context("Failed to read key")?;
    Ok(true)
}
