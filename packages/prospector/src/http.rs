//! HTTP client wrapper for fetching remote forum pages.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::{SourceType, HTTP_TIMEOUT_SECS};
use crate::error::{ProspectorError, Result};

/// User agent string identifying this prospector.
const USER_AGENT: &str = concat!("forum-prospector/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with a timeout and user agent.
pub fn create_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| invalid_url(USER_AGENT, e))
}

/// Download a page as text.
///
/// A single request is made; connection failures and non-success status
/// codes are reported as `InvalidSource` without retrying.
pub fn download_text(client: &Client, url: &str) -> Result<String> {
    tracing::debug!(url, "Fetching page");

    let response = client.get(url).send().map_err(|e| invalid_url(url, e))?;
    let response = response.error_for_status().map_err(|e| invalid_url(url, e))?;
    response.text().map_err(|e| invalid_url(url, e))
}

fn invalid_url(url: &str, err: reqwest::Error) -> ProspectorError {
    ProspectorError::InvalidSource {
        descriptor: url.to_string(),
        source_type: SourceType::HttpsUrl,
        reason: err.to_string(),
    }
}
