//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics and debugging.

use fluorite_core::paths::ResolvedPaths;

use crate::bootstrap::CliContext;

/// Execute the paths command.
///
/// Prints every path the install and launch flows use, in `key = value`
/// format.
pub fn execute(ctx: &CliContext) {
    let paths = ResolvedPaths::resolve(ctx.root(), &ctx.settings, ctx.platform);
    println!("{paths}");
}
