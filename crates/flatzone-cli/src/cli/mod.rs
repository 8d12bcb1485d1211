//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;

use crate::logging::init_tracing;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose);

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::execute(args).await,
        Some(Commands::Check(args)) => commands::check::execute(&args),
        None => commands::serve::execute(cli.serve).await,
    }
}
