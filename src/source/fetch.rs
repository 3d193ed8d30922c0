// src/source/fetch.rs
// =============================================================================
// Fetches a document over HTTP(S).
//
// Any failure here (bad URL, network error, non-2xx status) is reported as a
// plain retrieval error. It never reaches the link engine.
// =============================================================================

use anyhow::{anyhow, Result};
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Downloads the body of `url` as text
pub async fn fetch_document(url: &str, timeout: Duration) -> Result<String> {
    let url = parse_fetch_url(url)?;

    let client = Client::builder().timeout(timeout).build()?;

    debug!("fetching {}", url);
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| anyhow!("Failed to fetch {}: {}", url, e))?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to fetch {}: HTTP {}",
            url,
            response.status()
        ));
    }

    let content = response.text().await?;
    debug!("fetched {} byte(s)", content.len());
    Ok(content)
}

// Only absolute http/https URLs can be fetched
fn parse_fetch_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid URL '{}': {}", url, e))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(anyhow!("Unsupported URL scheme '{}': {}", other, url)),
    }
}
