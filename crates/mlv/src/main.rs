//! mlv CLI - ML Visualized content engine.
//!
//! Provides commands for:
//! - `serve`: Start the HTTP API server
//! - `nav`: Print the navigation tree or every canonical route
//! - `resolve`: Resolve a URL path to a page or redirect
//! - `progress`: Inspect and edit learner progress

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{NavArgs, ProgressCommand, ResolveArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// mlv - ML Visualized content engine.
#[derive(Parser)]
#[command(name = "mlv", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    Serve(ServeArgs),
    /// Print the navigation tree as JSON.
    Nav(NavArgs),
    /// Resolve a URL path.
    Resolve(ResolveArgs),
    /// Learner progress commands.
    #[command(subcommand)]
    Progress(ProgressCommand),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise RUST_LOG decides
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute(VERSION))),
        Commands::Nav(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
        Commands::Progress(cmd) => cmd.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
