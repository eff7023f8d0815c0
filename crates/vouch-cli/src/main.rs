//! Vouch CLI: command-line client for a running Vouch node.
//!
//! Subcommands: health, issuers, verify.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Vouch: credential verification dispatcher.
#[derive(Parser, Debug)]
#[command(name = "vouch", version, about, long_about = None)]
struct Cli {
    /// Log level for the client itself.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a node is up.
    Health(commands::health::HealthArgs),
    /// List the issuers a node can verify against.
    Issuers(commands::issuers::IssuersArgs),
    /// Verify a credential through a node.
    Verify(commands::verify::VerifyArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Health(args) => commands::health::run(args).await,
        Commands::Issuers(args) => commands::issuers::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
    }
}
