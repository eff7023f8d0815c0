//! `vouch health`: Probe a running node.

use clap::Args;
use serde::Deserialize;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

pub async fn run(args: &HealthArgs) -> anyhow::Result<()> {
    let url = format!("{}/health", args.endpoint.trim_end_matches('/'));
    tracing::debug!(%url, "probing node");

    match reqwest::get(&url).await {
        Ok(r) if r.status().is_success() => {
            let health: HealthResponse = r.json().await?;
            println!("Node at {} is {}", args.endpoint, health.status);
        }
        Ok(r) => anyhow::bail!("node returned HTTP {}", r.status()),
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
