//! API Client
//!
//! Main client for the targets service, combining the base URL with the
//! HTTP layer.

use super::http::ApiHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Main API client
#[derive(Clone)]
pub struct ApiClient {
    pub http: ApiHttpClient,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http(base_url, ApiHttpClient::new()?)
    }

    /// Create a new API client with a request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Self::with_http(base_url, ApiHttpClient::with_timeout(timeout)?)
    }

    fn with_http(base_url: &str, http: ApiHttpClient) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "Unsupported URL scheme '{}', expected http or https",
                base_url.scheme()
            ));
        }

        Ok(Self { http, base_url })
    }

    /// Base URL the client was configured with
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an absolute URL from a resource path such as `/targets/42`
    ///
    /// Any path prefix on the base URL is preserved.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Make a GET request for a resource path
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.http.get(&self.url(path)).await
    }
}

/// Format an API error for display
pub fn format_api_error(error: &anyhow::Error) -> String {
    super::http::format_api_error(error)
}
