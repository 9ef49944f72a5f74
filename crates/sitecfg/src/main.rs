//! sitecfg CLI - Documentation site configuration resolver.
//!
//! Provides commands for:
//! - `resolve`: Merge configuration documents and print the canonical config
//! - `check`: Validate each configuration document on its own

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ResolveArgs};
use output::Output;

/// sitecfg - Documentation site configuration resolver.
#[derive(Parser)]
#[command(name = "sitecfg", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve configuration documents into one canonical configuration.
    Resolve(ResolveArgs),
    /// Validate configuration documents without merging them.
    Check(CheckArgs),
}

/// --verbose enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Resolve(args) => args.verbose,
        Commands::Check(args) => args.verbose,
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
