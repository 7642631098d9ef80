//! Subcommand definitions.

use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the Python environment and install the game's dependencies
    Install {
        /// Remove an existing environment and create it from scratch
        #[arg(long)]
        recreate: bool,
    },

    /// Start the game inside its environment
    Launch,

    /// Check that Python, pip and the system requirements are available
    CheckDeps,

    /// Show every path the bootstrapper resolves
    Paths,
}
