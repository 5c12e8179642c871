//! HTTP transport for the Trustgate API.
//!
//! The resolver issues calls through the [`Transport`] trait: one
//! request/response exchange given a method, path, headers, and optional
//! JSON body, returning the raw response bytes. [`HttpTransport`] is the
//! production implementation backed by `reqwest`; tests substitute doubles
//! to script service behavior and count invocations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method};
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Secret credential header attached to every call.
pub const HEADER_SECRET_KEY: &str = "Trustgate-Secret-Key";
/// Verification ID header, set when resuming an in-flight verification.
pub const HEADER_VERIFICATION_ID: &str = "Trustgate-Verification-Id";
/// Source token header.
pub const HEADER_SOURCE_TOKEN: &str = "Trustgate-Source-Token";
/// Customer/user ID header.
pub const HEADER_CUSTOMER_ID: &str = "Trustgate-Customer-Id";
/// Session ID header.
pub const HEADER_SESSION_ID: &str = "Trustgate-Session-Id";

/// One request to the Trustgate API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path below the versioned API root (e.g. `/checkpoint`).
    pub path: String,
    /// Per-call headers. Entries with empty values are not sent.
    pub headers: Vec<(&'static str, String)>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

/// One request/response exchange with the service.
///
/// Implementations must be safe for concurrent callers; the client issues
/// independent resolutions without synchronization.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the exchange and return the raw response body.
    ///
    /// A non-2xx status is not a transport error: the service encodes
    /// logical failure in the body (`success: false`), and the resolver's
    /// retry logic keys off that. Only a failed exchange (connect, TLS,
    /// I/O) is an error.
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, ClientError>;
}

/// Production transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_version: String,
    secret: String,
}

impl HttpTransport {
    /// Create a transport for the given configuration and credential.
    pub fn new(secret: &str, config: &ClientConfig) -> Result<Self, ClientError> {
        let client = ClientBuilder::new()
            .timeout(config.http_timeout)
            .connect_timeout(Duration::from_secs(5)) // Quick fail on unreachable hosts
            .user_agent(format!("trustgate-rust/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            secret: secret.to_string(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}{}", self.base_url, self.api_version, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, ClientError> {
        let url = self.build_url(&request.path);
        debug!(url = %url, "sending API request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .header("Content-Type", "application/json; charset=UTF-8")
            .header(HEADER_SECRET_KEY, &self.secret);

        for (name, value) in &request.headers {
            if !value.is_empty() {
                builder = builder.header(*name, value);
            }
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "API request failed");
            ClientError::Transport {
                message: format!("request to {} failed: {}", url, e),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            // The body still carries the service's structured answer; the
            // resolver decides what a failed answer means.
            warn!(url = %url, status = %status, "non-success status from API");
        }

        let bytes = response.bytes().await.map_err(|e| ClientError::Transport {
            message: format!("failed to read response from {}: {}", url, e),
        })?;

        Ok(bytes.to_vec())
    }
}
