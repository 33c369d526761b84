//! Session client: token-aware delivery and checked request/response cycles.
//!
//! The daemon guards its RPC route with a rotating session token. A request
//! carrying a stale or empty token is answered with `409 Conflict` and the
//! current token in the [`SESSION_ID_HEADER`] response header; the client
//! stores it and tries again. Every other non-200 status, or a 200 whose body
//! cannot be read, spends one try. Transport failures end delivery at once.
//!
//! Each try is modelled as an [`Attempt`], so the token handshake can be
//! tested against a scripted transport without real network I/O.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::Instrument;

use crate::{
    ConfigError, Credentials, HttpRequest, HttpResponse, HttpTransport, RequestEnvelope,
    ResponseEnvelope, RpcError, SessionConfig, TagAllocator, TransportError,
};

/// Header carrying the session token in both directions.
pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

/// Outcome of a single delivery attempt that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// `409 Conflict`: retry with this token. Empty if the header was absent.
    RefreshToken(String),
    /// `200 OK` with a fully read body.
    Delivered(Vec<u8>),
    /// Any other status, or a `200` whose body could not be read.
    Discarded { status: u16 },
}

#[derive(Debug, Default)]
struct SessionState {
    token: String,
    credentials: Option<Credentials>,
}

/// One logical connection to a daemon instance.
///
/// Safe to share between tasks (e.g. behind an [`Arc`]). The session token and
/// credentials are guarded by a lock that is never held across an `.await`;
/// concurrent 409 handling converges on the latest token observed.
pub struct SessionClient {
    url: String,
    tries: u32,
    transport: Arc<dyn HttpTransport>,
    tags: Arc<TagAllocator>,
    state: RwLock<SessionState>,
}

impl SessionClient {
    /// Creates a client with its own [`TagAllocator`].
    ///
    /// Authentication starts enabled if `config` carries credentials.
    pub fn new(config: SessionConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            url: config.url(),
            tries: config.tries,
            transport,
            tags: Arc::new(TagAllocator::new()),
            state: RwLock::new(SessionState {
                token: String::new(),
                credentials: config.credentials,
            }),
        })
    }

    /// Draws tags from `tags` instead of a private allocator.
    #[must_use]
    pub fn with_tag_allocator(mut self, tags: Arc<TagAllocator>) -> Self {
        self.tags = tags;
        self
    }

    /// Full URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Configured try budget per request.
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Enables HTTP basic auth for subsequent requests.
    pub fn set_auth(&self, login: impl Into<String>, password: impl Into<String>) {
        self.state.write().credentials = Some(Credentials::new(login, password));
    }

    /// Disables HTTP basic auth and forgets the credentials.
    pub fn remove_auth(&self) {
        self.state.write().credentials = None;
    }

    pub fn auth_enabled(&self) -> bool {
        self.state.read().credentials.is_some()
    }

    /// The last token issued by the server; empty until the first 409.
    pub fn session_token(&self) -> String {
        self.state.read().token.clone()
    }

    /// Posts `payload` until the server answers `200 OK` or the try budget is
    /// spent, and returns the response body.
    ///
    /// Tries are immediate; there is no back-off between them.
    pub async fn deliver(&self, payload: &[u8]) -> Result<Vec<u8>, RpcError> {
        for attempt in 1..=self.tries {
            match self.attempt(payload).await? {
                Attempt::Delivered(body) => {
                    tracing::debug!(attempt, bytes = body.len(), "response received");
                    return Ok(body);
                }
                Attempt::RefreshToken(token) => {
                    tracing::info!(attempt, "server issued a new session token");
                    self.state.write().token = token;
                }
                Attempt::Discarded { status } => {
                    tracing::debug!(attempt, status, "attempt discarded");
                }
            }
        }

        tracing::warn!(tries = self.tries, url = %self.url, "delivery retries exhausted");
        Err(RpcError::RetriesExhausted { tries: self.tries })
    }

    /// Performs one delivery attempt with the current token and credentials.
    ///
    /// Does not modify the stored token; [`deliver`](Self::deliver) applies
    /// [`Attempt::RefreshToken`].
    pub async fn attempt(&self, payload: &[u8]) -> Result<Attempt, TransportError> {
        let request = self.build_request(payload);
        let response = self.transport.post(request).await?;
        Ok(classify(response).await)
    }

    /// Sends `method` with `arguments` and returns the checked response.
    ///
    /// Fails with [`RpcError::TagMismatch`] if the echoed tag differs, and
    /// with [`RpcError::Unsuccessful`] if the result is not `"success"`. Both
    /// carry the decoded envelope. Neither is retried.
    pub async fn request<A>(&self, method: &str, arguments: &A) -> Result<ResponseEnvelope, RpcError>
    where
        A: Serialize + ?Sized,
    {
        let tag = self.tags.next();
        let span = tracing::info_span!("rpc_request", method, %tag);

        async move {
            let payload = RequestEnvelope::new(method, arguments, tag)
                .to_bytes()
                .map_err(RpcError::Serialization)?;

            let body = self.deliver(&payload).await?;
            let response = ResponseEnvelope::from_slice(&body).map_err(RpcError::Deserialization)?;

            if response.tag != tag {
                tracing::warn!(received = %response.tag, "response tag does not match request");
                return Err(RpcError::TagMismatch {
                    expected: tag,
                    received: response.tag,
                    response: Box::new(response),
                });
            }
            if !response.is_success() {
                tracing::debug!(result = %response.result, "daemon reported failure");
                return Err(RpcError::Unsuccessful {
                    response: Box::new(response),
                });
            }
            Ok(response)
        }
        .instrument(span)
        .await
    }

    fn build_request(&self, payload: &[u8]) -> HttpRequest {
        let state = self.state.read();
        HttpRequest {
            url: self.url.clone(),
            body: payload.to_vec(),
            headers: vec![(SESSION_ID_HEADER.to_string(), state.token.clone())],
            basic_auth: state.credentials.clone(),
        }
    }
}

async fn classify(response: Box<dyn HttpResponse>) -> Attempt {
    match response.status() {
        409 => Attempt::RefreshToken(response.header(SESSION_ID_HEADER).unwrap_or_default()),
        200 => match response.read_body().await {
            Ok(body) => Attempt::Delivered(body),
            Err(error) => {
                tracing::debug!(error = %error, "failed to read response body");
                Attempt::Discarded { status: 200 }
            }
        },
        status => Attempt::Discarded { status },
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
