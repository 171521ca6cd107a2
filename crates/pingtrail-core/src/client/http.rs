//! reqwest-backed transport.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use tracing::{debug, warn};

use super::{ApiRequest, ApiResponse, Method, Transport, REFRESH_PATH};
use crate::error::{Error, Result};

/// HTTP transport with a cookie jar, so the refresh credential set by
/// login is replayed on `/auth/refresh/`.
///
/// The jar only lives as long as the transport. Front ends that outlive a
/// process export it with [`refresh_cookies`](Self::refresh_cookies) and
/// seed the next transport with [`restore_cookies`](Self::restore_cookies).
#[derive(Clone)]
pub struct HttpTransport {
    /// Base URL, without trailing slash
    base_url: String,
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The `Cookie` header the refresh endpoint would receive, if any.
    pub fn refresh_cookies(&self) -> Option<String> {
        let url = self.refresh_url().ok()?;
        let header = self.jar.cookies(&url)?;
        header.to_str().ok().map(String::from)
    }

    /// Seed the jar from a header returned by
    /// [`refresh_cookies`](Self::refresh_cookies).
    ///
    /// When a name repeats, the first value is kept.
    pub fn restore_cookies(&self, header: &str) -> Result<()> {
        let url = self.refresh_url()?;
        let mut seen = HashSet::new();
        for pair in header.split(';').map(str::trim) {
            let Some((name, _)) = pair.split_once('=') else {
                continue;
            };
            if name.is_empty() || !seen.insert(name) {
                continue;
            }
            self.jar.add_cookie_str(&format!("{}; Path=/", pair), &url);
        }
        Ok(())
    }

    fn refresh_url(&self) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, REFRESH_PATH);
        Url::parse(&raw).map_err(|e| Error::Validation(format!("Invalid API URL {}: {}", raw, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut req = self.client.request(method, &url);

        if let Some(ref token) = request.bearer {
            req = req.bearer_auth(token);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            warn!("HTTP request to {} failed: {}", url, e);
            Error::Network(format!("HTTP request failed: {}", e))
        })?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;
        debug!("API response: {} {} bytes", status, text.len());

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}
