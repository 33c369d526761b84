//! Client-side core for the Transmission JSON-over-HTTP RPC protocol.
//!
//! This crate turns a method name and an opaque argument payload into a
//! verified response. It handles the protocol's session-token handshake,
//! correlates replies with requests through tags, and checks the result
//! status. Method-specific schemas are left to callers.
//!
//! ## Architectural Layer
//!
//! **Protocol logic + port definitions.** This crate has no I/O dependencies.
//! HTTP is supplied through the [`HttpTransport`] port; the `transport` crate
//! provides the production implementation.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`tag`] | `Tag` newtype and the `TagAllocator` |
//! | [`envelope`] | Request/response wire envelopes |
//! | [`config`] | `SessionConfig` and `Credentials` |
//! | [`transport`] | `HttpTransport` port (plus `FakeTransport` for tests) |
//! | [`client`] | `SessionClient` delivery and request cycle |
//! | [`errors`] | `RpcError`, `TransportError`, `ConfigError` |

pub mod client;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod tag;
pub mod transport;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::{Attempt, SessionClient, SESSION_ID_HEADER};
pub use config::{Credentials, SessionConfig, DEFAULT_ENDPOINT, DEFAULT_TRIES};
pub use envelope::{RequestEnvelope, ResponseEnvelope, SUCCESS_RESULT};
pub use errors::{ConfigError, RpcError, TransportError};
pub use tag::{Tag, TagAllocator};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};

#[cfg(any(test, feature = "test-support"))]
pub use transport::{request_tag, FakeResponse, FakeTransport};
