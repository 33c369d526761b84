//! Error types for the RPC core.
//!
//! [`RpcError`] is what callers of [`SessionClient`](crate::SessionClient) see.
//! Each failure mode is a distinct variant; nothing is coalesced into a
//! generic failure. [`TransportError`] is produced by implementations of the
//! [`HttpTransport`](crate::HttpTransport) port and is surfaced unchanged.
//!
//! The only condition recovered locally is the 409 session-token handshake,
//! which is ordinary protocol flow and never appears here.

use thiserror::Error;

use crate::{ResponseEnvelope, Tag};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures raised by an [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The target URL could not be parsed.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The request could not be sent or no response was received
    /// (connection refused, DNS failure, timeout, TLS failure).
    #[error("HTTP request to '{url}' failed")]
    Request {
        /// Target of the failed request.
        url: String,
        #[source]
        source: BoxError,
    },

    /// The response body could not be read to completion.
    #[error("failed to read response body")]
    Body {
        #[source]
        source: BoxError,
    },
}

// ---------------------------------------------------------------------------
// RPC errors
// ---------------------------------------------------------------------------

/// Errors returned by [`SessionClient`](crate::SessionClient).
#[derive(Debug, Error)]
pub enum RpcError {
    /// The underlying HTTP call could not be made. Never retried.
    #[error("transport error")]
    Transport(#[from] TransportError),

    /// Every attempt ended in a non-200 status or an unreadable body.
    #[error("gave up after {tries} tries")]
    RetriesExhausted {
        /// Configured try budget.
        tries: u32,
    },

    /// The request envelope could not be encoded. No network call was made.
    #[error("failed to encode request")]
    Serialization(#[source] serde_json::Error),

    /// The response body is not a valid response envelope.
    #[error("failed to decode response")]
    Deserialization(#[source] serde_json::Error),

    /// The echoed tag differs from the one sent.
    ///
    /// The decoded envelope is kept for diagnostics but must not be trusted.
    #[error("tag mismatch ({received} != {expected})")]
    TagMismatch {
        /// Tag sent with the request.
        expected: Tag,
        /// Tag found in the reply.
        received: Tag,
        /// The decoded reply.
        response: Box<ResponseEnvelope>,
    },

    /// The tag matched but `result` is not the success marker.
    #[error("unsuccessful response: {}", .response.result)]
    Unsuccessful {
        /// The decoded reply; `result` holds the daemon's failure description.
        response: Box<ResponseEnvelope>,
    },
}

impl RpcError {
    /// Returns the decoded envelope carried by tag-mismatch and
    /// unsuccessful-result errors.
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        match self {
            Self::TagMismatch { response, .. } | Self::Unsuccessful { response } => Some(response),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A [`SessionConfig`](crate::SessionConfig) failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The daemon address is empty or whitespace.
    #[error("daemon address must not be empty")]
    EmptyAddress,

    /// The try budget is zero, so no request could ever be sent.
    #[error("at least one delivery attempt is required")]
    ZeroTries,
}
