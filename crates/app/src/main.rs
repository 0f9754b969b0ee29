//! WexBloit configuration builder - Main Entry Point
//!
//! Parses the command line, initializes logging and dispatches to the
//! subcommand handlers.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wexcfg_application::ApplicationError;

use crate::cli::Cli;

/// Exit code for failures other than validation errors.
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so generated YAML on stdout stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("wexcfg v{}", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout().lock();
    match commands::run(cli, &mut stdout).await {
        Ok(code) => code,
        Err(error @ ApplicationError::Invalid(_)) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
