//! `vouch verify`: Verify a credential through a running node.

use clap::Args;
use serde::Serialize;

use vouch_core::{VerificationConfig, VerificationResult, VerifierKind};

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential JSON (as string or path to file).
    #[arg(short, long)]
    pub credential: String,

    /// Verification method (online, offline).
    #[arg(short, long, default_value = "online")]
    pub method: VerifierKind,

    /// Issuer to verify against. Required for online verification.
    #[arg(short, long)]
    pub issuer: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct VerifyRequest {
    credential: serde_json::Value,
    config: VerificationConfig,
}

fn build_config(args: &VerifyArgs) -> anyhow::Result<VerificationConfig> {
    match args.method {
        VerifierKind::Offline => Ok(VerificationConfig::offline()),
        VerifierKind::Online => match args.issuer.as_deref() {
            Some(issuer) => Ok(VerificationConfig::online(issuer)),
            None => anyhow::bail!("--issuer is required for online verification"),
        },
    }
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    // Try reading as file first, then as inline JSON
    let json_str = if std::path::Path::new(&args.credential).exists() {
        std::fs::read_to_string(&args.credential)?
    } else {
        args.credential.clone()
    };

    let credential: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| anyhow::anyhow!("invalid credential JSON: {}", e))?;

    let body = VerifyRequest {
        credential,
        config: build_config(args)?,
    };
    let url = format!("{}/verification", args.endpoint.trim_end_matches('/'));
    tracing::debug!(%url, method = %args.method, "submitting credential");

    let client = reqwest::Client::new();
    let resp = match client.post(&url).json(&body).send().await {
        Ok(r) => r,
        Err(e) => {
            super::unreachable(&args.endpoint, &e);
            return Ok(());
        }
    };
    if !resp.status().is_success() {
        return Err(super::node_error("verification failed", resp).await);
    }

    let result: VerificationResult = resp.json().await?;
    if result.success {
        println!("Credential is VALID");
    } else {
        println!("Credential is INVALID");
    }
    println!("  {}", result.message);
    for entry in result.errors.iter().flatten() {
        println!("  [FAIL] {}", entry.error);
        if entry.raw != entry.error {
            println!("         raw: {}", entry.raw);
        }
    }

    Ok(())
}
