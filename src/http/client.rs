//! HTTP client for the Recharge API
//!
//! Thin wrapper around reqwest that:
//! - attaches the fixed header set to every request
//! - turns non-success statuses into `Error::HttpStatus`
//! - decodes the body as JSON, reporting malformed bodies as `Error::Decode`
//!
//! There are no retries. A failed request fails the whole fetch.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Header carrying the access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Recharge-Access-Token";

/// Header carrying the API version
pub const API_VERSION_HEADER: &str = "X-Recharge-Version";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(ACCEPT.to_string(), "application/json".to_string());

        Self {
            timeout: Duration::from_secs(30),
            default_headers,
            user_agent: format!("recharge-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the access token and API version headers
    pub fn recharge_auth(self, token: impl Into<String>, api_version: impl Into<String>) -> Self {
        self.header(ACCESS_TOKEN_HEADER, token)
            .header(API_VERSION_HEADER, api_version)
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with a fixed header set
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let headers = build_header_map(&config.default_headers)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// GET a URL and decode the body as JSON
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON from {url}: {e}")))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.config.timeout)
            .field("user_agent", &self.config.user_agent)
            .finish_non_exhaustive()
    }
}

fn build_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::invalid_value(key.clone(), format!("bad header name: {e}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_value(key.clone(), format!("bad header value: {e}")))?;
        if key.eq_ignore_ascii_case(ACCESS_TOKEN_HEADER) {
            value.set_sensitive(true);
        }
        map.insert(name, value);
    }
    Ok(map)
}
