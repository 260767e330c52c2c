//! One-shot retrieval of the dataset and configuration sources.

use anyhow::bail;
use tracing::debug;

/// Where the two datasets and the facet configuration live. The default
/// base comes from `CATALOG_BASE_URL`, falling back to a local dev server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    pub locations_url: String,
    pub catalog_url: String,
    pub config_url: String,
}

impl SourceUrls {
    pub fn from_env() -> Self {
        let base = std::env::var("CATALOG_BASE_URL").unwrap_or("http://127.0.0.1:8000".to_string());
        Self {
            locations_url: format!("{base}/data/locations.tsv"),
            catalog_url: format!("{base}/data/catalog.tsv"),
            config_url: format!("{base}/data/facets.json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawSources {
    pub locations_tsv: String,
    pub catalog_tsv: String,
    pub config_json: String,
}

/// Fetch all three sources once. There is no retry or backoff here; reload
/// policy belongs to the caller.
pub async fn fetch_sources(urls: &SourceUrls) -> anyhow::Result<RawSources> {
    let client = reqwest::Client::new();
    let locations_tsv = fetch_text(&client, &urls.locations_url).await?;
    let catalog_tsv = fetch_text(&client, &urls.catalog_url).await?;
    let config_json = fetch_text(&client, &urls.config_url).await?;
    Ok(RawSources { locations_tsv, catalog_tsv, config_json })
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    let t0 = std::time::Instant::now();
    let response = client.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if status.is_client_error() || status.is_server_error() {
        bail!("Error fetching {}: {}: {}", url, status, body);
    }
    debug!(url, len = body.len(), ms = t0.elapsed().as_millis() as u64, "source fetched");
    Ok(body)
}
