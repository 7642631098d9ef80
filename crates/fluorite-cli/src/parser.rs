//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use fluorite_core::paths::ROOT_ENV;

use crate::commands::Commands;

/// Command-line interface for installing and launching the game.
#[derive(Debug, Parser)]
#[command(name = "fluorite")]
#[command(about = "Install and launch the Fluorite game")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Project root containing requirements.txt and src/main.py
    #[arg(long, global = true, env = ROOT_ENV, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Never wait for a key press before exiting
    #[arg(long = "no-pause", global = true)]
    pub no_pause: bool,

    #[command(subcommand)]
    pub command: Commands,
}
