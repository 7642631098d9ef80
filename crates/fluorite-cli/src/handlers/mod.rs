//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<(), CliError>`
//! - Thin wrappers that build an orchestration from the context, run it,
//!   and format the outcome for the terminal
//!
//! Handlers should NOT contain install or launch logic themselves.

pub mod check_deps;
pub mod install;
pub mod launch;
pub mod paths;
