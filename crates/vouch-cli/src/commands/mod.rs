pub mod health;
pub mod issuers;
pub mod verify;

/// Default API endpoint of a local node.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9100";

#[derive(serde::Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
    pub detail: Option<String>,
}

/// Turn a non-success response into an error carrying the node's message.
pub(crate) async fn node_error(context: &str, resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    match resp.json::<ErrorResponse>().await {
        Ok(err) => match err.detail {
            Some(detail) => anyhow::anyhow!(
                "{} (HTTP {}): {} ({})",
                context,
                status,
                err.error,
                detail
            ),
            None => anyhow::anyhow!("{} (HTTP {}): {}", context, status, err.error),
        },
        Err(_) => anyhow::anyhow!("{} (HTTP {})", context, status),
    }
}

pub(crate) fn unreachable(endpoint: &str, e: &reqwest::Error) {
    println!("Could not reach node at {}", endpoint);
    println!("  Error: {}", e);
    println!();
    println!("Is the node running? Start it with: vouch-node");
}
