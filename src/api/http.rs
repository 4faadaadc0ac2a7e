//! HTTP utilities for REST API calls

use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for JSON API calls
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
}

impl ApiHttpClient {
    /// Create a new HTTP client with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a new HTTP client with an explicit request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ttargets/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request and parse the JSON body
    pub async fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Format an API error for the status bar
pub fn format_api_error(error: &anyhow::Error) -> String {
    let error_str = format!("{:#}", error);

    // Transport errors carry the URL, whose port may look like a status code
    if error_str.contains("Failed to send request") {
        return "Could not reach the server. Check the URL and your network.".to_string();
    }
    if error_str.contains("Failed to parse response JSON") {
        return "Server returned a response that is not JSON.".to_string();
    }

    if error_str.contains("404") {
        return "Resource not found.".to_string();
    }
    if error_str.contains("401") || error_str.contains("403") {
        return "Access denied by the server.".to_string();
    }
    if error_str.contains("429") {
        return "Rate limit exceeded. Please try again later.".to_string();
    }
    if error_str.contains("400") {
        return "Invalid request.".to_string();
    }
    if error_str.contains("500") || error_str.contains("502") || error_str.contains("503") {
        return "Server temporarily unavailable. Please try again.".to_string();
    }

    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
