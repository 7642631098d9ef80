//! CLI entry point - the composition root.
//!
//! Parses arguments, wires the context via bootstrap, dispatches to a
//! handler, prints the final diagnostic and pauses when configured to.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fluorite_cli::bootstrap::fallback_pause;
use fluorite_cli::presentation::print_error;
use fluorite_cli::utils::wait_for_key;
use fluorite_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};
use fluorite_runtime::DefaultSystemProbe;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli, pause: &mut bool) -> Result<(), CliError> {
    let config = CliConfig::from_cli(cli)?;
    let ctx = bootstrap(config)?;
    *pause = ctx.settings.pause_on_exit;

    match &cli.command {
        Commands::Install { recreate } => handlers::install::execute(&ctx, *recreate).await,
        Commands::Launch => handlers::launch::execute(&ctx).await,
        Commands::CheckDeps => {
            let probe = DefaultSystemProbe::new(
                Arc::clone(&ctx.deps.runner),
                ctx.settings.clone(),
                ctx.platform,
            );
            handlers::check_deps::execute(&probe, ctx.settings.graphics.min_major_version).await?;
            Ok(())
        }
        Commands::Paths => {
            handlers::paths::execute(&ctx);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut pause = fallback_pause(&cli);
    let code = match run(&cli, &mut pause).await {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err);
            err.exit_code()
        }
    };

    if let Err(e) = wait_for_key(pause) {
        tracing::debug!(error = %e, "Exit pause failed");
    }

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
