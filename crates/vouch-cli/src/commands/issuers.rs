//! `vouch issuers`: List the verifier catalog of a node.

use clap::Args;
use serde::Deserialize;

use vouch_core::{IssuerDescriptor, VerifierKind};

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct IssuersArgs {
    /// Only list issuers of this kind (online, offline).
    #[arg(short = 't', long = "type")]
    pub kind: Option<VerifierKind>,

    /// Print the raw JSON response.
    #[arg(long)]
    pub json: bool,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct IssuersResponse {
    count: usize,
    data: Vec<IssuerDescriptor>,
}

pub async fn run(args: &IssuersArgs) -> anyhow::Result<()> {
    let mut url = format!("{}/issuers", args.endpoint.trim_end_matches('/'));
    if let Some(kind) = args.kind {
        url.push_str("?type=");
        url.push_str(kind.as_str());
    }

    let resp = match reqwest::get(&url).await {
        Ok(r) => r,
        Err(e) => {
            super::unreachable(&args.endpoint, &e);
            return Ok(());
        }
    };
    if !resp.status().is_success() {
        return Err(super::node_error("listing issuers failed", resp).await);
    }

    if args.json {
        let raw: serde_json::Value = resp.json().await?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let issuers: IssuersResponse = resp.json().await?;
    if issuers.count == 0 {
        println!("No issuers available.");
        return Ok(());
    }

    println!("Issuers ({}):", issuers.count);
    for issuer in &issuers.data {
        println!(
            "  {:<12} {:<8} {}",
            issuer.id,
            issuer.kind.as_str(),
            issuer.title
        );
        if !issuer.description.is_empty() {
            println!("  {:<12} {:<8} {}", "", "", issuer.description);
        }
    }

    Ok(())
}
