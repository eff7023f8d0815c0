//! Vouch Node: entry point.
//!
//! Serves the verifier catalog and credential verification over HTTP, with
//! configuration from a TOML file, the environment, and CLI flags.

mod api;
mod config;
mod state;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use vouch_core::Settings;
use vouch_verifiers::VerifierRegistry;

use config::{Environment, NodeConfig};
use state::AppState;

/// Vouch verification node
#[derive(Parser, Debug)]
#[command(name = "vouch-node", version, about = "Vouch verification node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "vouch.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the deployment environment (development, production).
    #[arg(long)]
    environment: Option<Environment>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle --init flag before touching any existing file
    if args.init {
        init_tracing(args.log_level.as_deref().unwrap_or("info"), "text");
        NodeConfig::write_default(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    // Load configuration
    let mut config = NodeConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(environment) = args.environment {
        config.api.environment = environment;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging.level, &config.logging.format);

    tracing::info!(
        environment = %config.api.environment,
        "Vouch node v{}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = config.verifier_settings(Settings::from_env());
    let state = Arc::new(AppState::new(
        VerifierRegistry::builtin(),
        settings,
        config.api.environment,
    ));
    tracing::info!(issuers = state.catalog.len(), "issuer catalog ready");

    api::start_api_server(config.api_addr()?, state, shutdown_signal()).await?;

    tracing::info!("Vouch node exited cleanly");
    Ok(())
}
