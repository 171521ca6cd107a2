//! API client for the ping game backend.
//!
//! [`ApiClient`] turns each endpoint into a typed call. The wire itself is
//! behind the [`Transport`] trait so the session and store logic can run
//! against any HTTP stack; [`HttpTransport`] is the reqwest implementation.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pingtrail_core::client::{ApiClient, HttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> pingtrail_core::Result<()> {
//!     let transport = HttpTransport::new("http://localhost:3000/api", 30)?;
//!     let client = ApiClient::new(transport);
//!     let page = client.fetch_all_pings(None).await?;
//!     println!("{} pings", page.results.len());
//!     Ok(())
//! }
//! ```

#[cfg(feature = "client")]
mod http;
#[cfg(test)]
pub(crate) mod mock;

#[cfg(feature = "client")]
pub use http::HttpTransport;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::*;

/// Error codes the server uses that the client renames.
const ERROR_CODE_ALIASES: &[(&str, &str)] = &[("no_active_account", "authentication_failed")];

/// Endpoint that exchanges the refresh cookie for an access token.
pub const REFRESH_PATH: &str = "/auth/refresh/";

/// HTTP verb subset used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        f.write_str(verb)
    }
}

/// A request as handed to the transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/pings/latest`
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Bearer token; when `None` no Authorization header is sent
    pub bearer: Option<String>,
}

/// Raw response from the transport.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Wire-level seam between the core and an HTTP stack.
///
/// Implementations only fail with [`Error::Network`]; status codes are
/// interpreted by [`ApiClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request).await
    }
}

/// Typed API client
#[derive(Clone)]
pub struct ApiClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange credentials for a user and access token
    pub async fn login(&self, code_name: &str, password: &str) -> Result<TokenResponse> {
        let req = LoginRequest {
            code_name: code_name.to_string(),
            password: password.to_string(),
        };
        self.post("/auth/login/", &req, None).await
    }

    /// Exchange the stored refresh credential for a fresh access token
    pub async fn refresh(&self) -> Result<TokenResponse> {
        self.send(Method::Post, REFRESH_PATH, None, None).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ping Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List every ping visible to the caller
    ///
    /// Pings with out-of-range coordinates are dropped, not fatal.
    pub async fn fetch_all_pings(&self, bearer: Option<&str>) -> Result<PingPage> {
        let mut page: PingPage = self.get("/pings", bearer).await?;
        page.results = retain_valid(page.results);
        Ok(page)
    }

    /// Latest pings for the caller
    pub async fn fetch_latest_pings(&self, bearer: Option<&str>) -> Result<Vec<Ping>> {
        let resp: LatestPingsResponse = self.get("/pings/latest", bearer).await?;
        Ok(retain_valid(resp.pings))
    }

    /// Create a ping, optionally replying to `parent`
    pub async fn create_ping(
        &self,
        coords: Coordinates,
        parent: Option<PingId>,
        bearer: Option<&str>,
    ) -> Result<Ping> {
        let req = CreatePingRequest {
            latitude: coords.latitude,
            longitude: coords.longitude,
            parent,
        };
        let resp: PingResponse = self.post("/pings", &req, bearer).await?;
        resp.ping.validate()?;
        Ok(resp.ping)
    }

    /// Respond to a specific ping
    pub async fn respond_to_ping(
        &self,
        parent_id: PingId,
        coords: Coordinates,
        bearer: Option<&str>,
    ) -> Result<Ping> {
        let req = RespondRequest {
            latitude: coords.latitude,
            longitude: coords.longitude,
        };
        let path = format!("/pings/{}/respond/", parent_id);
        let resp: PingResponse = self.post(&path, &req, bearer).await?;
        resp.ping.validate()?;
        Ok(resp.ping)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // HTTP Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn get<R: DeserializeOwned>(&self, path: &str, bearer: Option<&str>) -> Result<R> {
        self.send(Method::Get, path, None, bearer).await
    }

    async fn post<R: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<R> {
        let body = serde_json::to_value(body)
            .map_err(|e| Error::Validation(format!("Failed to encode request: {}", e)))?;
        self.send(Method::Post, path, Some(body), bearer).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<R> {
        debug!("API request: {} {} (auth: {})", method, path, bearer.is_some());

        let resp = self
            .transport
            .execute(ApiRequest {
                method,
                path: path.to_string(),
                body,
                bearer: bearer.map(String::from),
            })
            .await?;

        if !resp.is_success() {
            return Err(status_error(path, &resp));
        }

        serde_json::from_value(resp.body)
            .map_err(|e| Error::Validation(format!("Malformed response from {}: {}", path, e)))
    }
}

fn retain_valid(pings: Vec<Ping>) -> Vec<Ping> {
    pings
        .into_iter()
        .filter(|ping| match ping.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping ping: {}", e);
                false
            }
        })
        .collect()
}

/// Map a non-success response onto the error taxonomy.
fn status_error(path: &str, resp: &ApiResponse) -> Error {
    let (code, message) = error_detail(&resp.body);
    debug!("API error {} on {}: {} ({})", resp.status, path, message, code);

    match resp.status {
        401 | 403 => Error::Auth { code, message },
        400 | 422 => Error::Validation(message),
        404 => {
            if message.is_empty() {
                Error::NotFound(path.to_string())
            } else {
                Error::NotFound(message)
            }
        }
        status => Error::Server {
            status,
            code,
            message,
        },
    }
}

/// Pull `(code, message)` out of an error body.
///
/// Understands the `{ error: { code, message } }` envelope and the plain
/// `{ detail }` form; anything else yields empty strings.
fn error_detail(body: &serde_json::Value) -> (String, String) {
    if let Ok(envelope) = serde_json::from_value::<ErrorEnvelope>(body.clone()) {
        let code = ERROR_CODE_ALIASES
            .iter()
            .find(|(from, _)| *from == envelope.error.code)
            .map(|(_, to)| to.to_string())
            .unwrap_or(envelope.error.code);
        return (code, envelope.error.message);
    }

    let message = body
        .get("detail")
        .and_then(|d| d.as_str())
        .unwrap_or_default()
        .to_string();
    ("error".to_string(), message)
}
