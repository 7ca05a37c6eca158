//! shipver CLI - forward-only deployments with a semantic version ledger

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod context;
mod maintenance;

use cli::Cli;
use commands::{deploy, install, make, notes, status, version};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Install => install::execute(&cli.global),
        cli::Commands::Deploy(args) => deploy::execute(args, &cli.global),
        cli::Commands::Make(args) => make::execute(args, &cli.global),
        cli::Commands::Version(args) => version::execute(args, &cli.global),
        cli::Commands::Notes(args) => notes::execute(args, &cli.global),
        cli::Commands::Status => status::execute(&cli.global),
    }
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
