//! HTTP client creation and request handling for drug pages.

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{cookie::Jar, header};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use super::types::REQUEST_TIMEOUT;
use crate::TARGET_WEB_REQUEST;

pub const DRUG_PAGE_BASE: &str = "https://www.drugbank.ca/drugs";

// DrugBank ids are a fixed-width code, e.g. "DB00274".
static DRUG_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new("^DB[0-9]{5}$").unwrap());

// The site sits behind Cloudflare and rejects bare library defaults, so
// every request carries ordinary browser headers.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:80.0) Gecko/20100101 Firefox/80.0";
const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Create the client shared by all page fetches in a run.
pub fn create_http_client() -> Result<reqwest::Client> {
    let cookie_store = Jar::default();
    reqwest::Client::builder()
        .cookie_store(true)
        .cookie_provider(Arc::new(cookie_store))
        .gzip(true)
        .redirect(reqwest::redirect::Policy::default())
        .build()
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))
}

/// Build the page URL for one DrugBank id, rejecting malformed ids.
pub fn drug_page_url(drug_id: &str) -> Result<Url> {
    if !DRUG_ID_PATTERN.is_match(drug_id) {
        bail!("Not a DrugBank id: {:?}", drug_id);
    }
    let raw = format!("{}/{}", DRUG_PAGE_BASE, drug_id);
    Url::parse(&raw).with_context(|| format!("Invalid drug page URL: {}", raw))
}

/// Fetch the raw HTML body of one drug page.
pub async fn fetch_drug_page(client: &reqwest::Client, drug_id: &str) -> Result<String> {
    let url = drug_page_url(drug_id)?;
    debug!(target: TARGET_WEB_REQUEST, "Requesting {}", url);

    let response = timeout(
        REQUEST_TIMEOUT,
        client
            .get(url.clone())
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, ACCEPT)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send(),
    )
    .await
    .map_err(|_| {
        anyhow!(
            "Request to {} timed out after {} seconds",
            url,
            REQUEST_TIMEOUT.as_secs()
        )
    })?
    .with_context(|| format!("Request to {} failed", url))?;

    if !response.status().is_success() {
        bail!("Request to {} returned status {}", url, response.status());
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))
}
