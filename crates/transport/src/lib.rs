//! reqwest-backed HTTP transport for the Transmission RPC client.
//!
//! Implements the [`rpc::HttpTransport`] port. The [`rpc`] crate sees only
//! the trait; TLS, connection pooling, redirects and timeouts are configured
//! here on the underlying [`reqwest::Client`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** No protocol rules live here: status codes, the session
//! token and retries are handled by [`rpc::SessionClient`].

use std::time::Duration;

use async_trait::async_trait;
use rpc::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use thiserror::Error;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("transmission-rpc/", env!("CARGO_PKG_VERSION"));

/// Settings for the underlying HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Upper bound on one HTTP exchange (connect, send, receive). `None`
    /// waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// The HTTP client could not be constructed.
#[derive(Debug, Error)]
#[error("failed to build HTTP client")]
pub struct BuildError(#[from] reqwest::Error);

/// [`HttpTransport`] over a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, BuildError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wraps an existing client, keeping whatever it was configured with.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<Box<dyn HttpResponse>, TransportError> {
        let url = reqwest::Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let mut builder = self.client.post(url).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &request.basic_auth {
            builder = builder.basic_auth(&credentials.login, Some(&credentials.password));
        }

        let response = builder.send().await.map_err(|e| TransportError::Request {
            url: request.url.clone(),
            source: Box::new(e),
        })?;
        tracing::trace!(status = response.status().as_u16(), url = %request.url, "HTTP response");

        Ok(Box::new(ReqwestResponse(response)))
    }
}

struct ReqwestResponse(reqwest::Response);

#[async_trait]
impl HttpResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.0.status().as_u16()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.0
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    async fn read_body(self: Box<Self>) -> Result<Vec<u8>, TransportError> {
        self.0
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| TransportError::Body { source: Box::new(e) })
    }
}
