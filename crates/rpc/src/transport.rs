//! Port through which the session client performs HTTP I/O.
//!
//! The core never talks to the network directly. Infrastructure crates
//! implement [`HttpTransport`]; tests use the scripted fake in this module
//! (enabled by `cfg(test)` or the `test-support` feature).
//!
//! Timeouts, TLS, connection pooling and redirects are the transport's
//! business.

use async_trait::async_trait;

use crate::{Credentials, TransportError};

/// One outbound HTTP POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
    /// Present only when authentication is enabled on the client.
    pub basic_auth: Option<Credentials>,
}

impl HttpRequest {
    /// Returns the first header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received response whose body has not been read yet.
///
/// Dropping the box closes the body.
#[async_trait]
pub trait HttpResponse: Send {
    fn status(&self) -> u16;

    /// Returns the header value with the given name, if present and valid
    /// UTF-8.
    fn header(&self, name: &str) -> Option<String>;

    /// Reads the body to completion.
    async fn read_body(self: Box<Self>) -> Result<Vec<u8>, TransportError>;
}

/// Performs HTTP POSTs on behalf of a [`SessionClient`](crate::SessionClient).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and returns the response head.
    ///
    /// Any `Err` is treated as fatal by the caller and is not retried.
    async fn post(&self, request: HttpRequest) -> Result<Box<dyn HttpResponse>, TransportError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{HttpRequest, HttpResponse, HttpTransport};
    use crate::{Tag, TransportError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    type Handler = Box<dyn FnMut(&HttpRequest) -> Result<FakeResponse, TransportError> + Send>;

    /// Canned response returned by [`FakeTransport`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FakeResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        /// `Err` simulates a body that fails midway through reading.
        pub body: Result<Vec<u8>, String>,
    }

    impl FakeResponse {
        pub fn new(status: u16) -> Self {
            Self { status, headers: Vec::new(), body: Ok(Vec::new()) }
        }

        pub fn ok(body: impl Into<Vec<u8>>) -> Self {
            Self { status: 200, headers: Vec::new(), body: Ok(body.into()) }
        }

        /// 200 with a body that cannot be read.
        pub fn unreadable() -> Self {
            Self { status: 200, headers: Vec::new(), body: Err("connection reset".to_string()) }
        }

        /// 409 carrying a fresh session token.
        pub fn conflict(token: &str) -> Self {
            Self::new(409).with_header(crate::SESSION_ID_HEADER, token)
        }

        /// 200 whose body echoes the request's tag with the given result.
        pub fn echo(request: &HttpRequest, result: &str, arguments: serde_json::Value) -> Self {
            let tag = request_tag(request).unwrap_or_default();
            let body = serde_json::json!({ "arguments": arguments, "result": result, "tag": tag });
            Self::ok(body.to_string())
        }

        pub fn with_header(mut self, name: &str, value: &str) -> Self {
            self.headers.push((name.to_string(), value.to_string()));
            self
        }
    }

    /// Extracts the tag from a request body produced by the session client.
    pub fn request_tag(request: &HttpRequest) -> Option<Tag> {
        let body: serde_json::Value = serde_json::from_slice(&request.body).ok()?;
        body.get("tag")?.as_i64().map(Tag::new)
    }

    #[derive(Debug)]
    struct FakeBodyError(String);

    impl std::fmt::Display for FakeBodyError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl std::error::Error for FakeBodyError {}

    #[async_trait]
    impl HttpResponse for FakeResponse {
        fn status(&self) -> u16 {
            self.status
        }

        fn header(&self, name: &str) -> Option<String> {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone())
        }

        async fn read_body(self: Box<Self>) -> Result<Vec<u8>, TransportError> {
            self.body
                .map_err(|message| TransportError::Body { source: Box::new(FakeBodyError(message)) })
        }
    }

    struct FakeTransportState {
        script: VecDeque<Handler>,
        fallback: Option<Handler>,
        requests: Vec<HttpRequest>,
    }

    /// Scripted transport for testing.
    ///
    /// Scripted steps are consumed in order; once the script is empty the
    /// fallback handler (if any) answers every request. With neither, the
    /// fake fails like an unreachable server.
    #[derive(Clone)]
    pub struct FakeTransport {
        inner: Arc<Mutex<FakeTransportState>>,
    }

    impl Default for FakeTransport {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeTransportState {
                    script: VecDeque::new(),
                    fallback: None,
                    requests: Vec::new(),
                })),
            }
        }
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a canned response.
        pub fn push(&self, response: FakeResponse) -> &Self {
            self.push_with(move |_| response.clone())
        }

        /// Queues a response computed from the request.
        pub fn push_with<F>(&self, mut handler: F) -> &Self
        where
            F: FnMut(&HttpRequest) -> FakeResponse + Send + 'static,
        {
            self.inner.lock().script.push_back(Box::new(move |request| Ok(handler(request))));
            self
        }

        /// Queues a transport-level failure.
        pub fn push_failure(&self, url: &str) -> &Self {
            let url = url.to_string();
            self.inner
                .lock()
                .script
                .push_back(Box::new(move |_| Err(unreachable_error(&url))));
            self
        }

        /// Answers every request once the script is exhausted.
        pub fn respond_always<F>(&self, mut handler: F) -> &Self
        where
            F: FnMut(&HttpRequest) -> FakeResponse + Send + 'static,
        {
            self.inner.lock().fallback = Some(Box::new(move |request| Ok(handler(request))));
            self
        }

        /// All requests received so far.
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.inner.lock().requests.clone()
        }
    }

    fn unreachable_error(url: &str) -> TransportError {
        TransportError::Request {
            url: url.to_string(),
            source: Box::new(FakeBodyError("connection refused".to_string())),
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn post(&self, request: HttpRequest) -> Result<Box<dyn HttpResponse>, TransportError> {
            let outcome = {
                let mut state = self.inner.lock();
                state.requests.push(request.clone());
                let step = state.script.pop_front();
                match step {
                    Some(mut step) => step(&request),
                    None => match state.fallback.as_mut() {
                        Some(handler) => handler(&request),
                        None => Err(unreachable_error(&request.url)),
                    },
                }
            };
            outcome.map(|response| Box::new(response) as Box<dyn HttpResponse>)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{request_tag, FakeResponse, FakeTransport};
