//! Wire envelopes wrapping every call and reply.
//!
//! Request:
//!
//! ```json
//! { "method": "session-get", "arguments": {}, "tag": 7 }
//! ```
//!
//! Response:
//!
//! ```json
//! { "arguments": {}, "result": "success", "tag": 7 }
//! ```
//!
//! The `arguments` payload is opaque here; its shape is defined per method by
//! the caller.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::Tag;

/// The `result` value the daemon uses to report success.
pub const SUCCESS_RESULT: &str = "success";

/// Outbound call: method name, caller-defined arguments, correlation tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEnvelope<A> {
    /// Daemon method name, e.g. `"torrent-get"`.
    pub method: String,
    /// Method-specific payload, passed through untouched.
    pub arguments: A,
    /// Correlation tag the daemon must echo back.
    pub tag: Tag,
}

impl<A: Serialize> RequestEnvelope<A> {
    /// Wraps `arguments` for `method` under the given `tag`.
    pub fn new(method: impl Into<String>, arguments: A, tag: Tag) -> Self {
        Self {
            method: method.into(),
            arguments,
            tag,
        }
    }

    /// Encodes the envelope as JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

// ---------------------------------------------------------------------------

/// Inbound reply as decoded from the daemon.
///
/// Decoding is lenient: a missing or `null` field takes its zero value, so
/// arguments become an empty map, the result becomes the empty string, and
/// the tag becomes zero.
/// Neither the tag nor the result is trusted until
/// [`SessionClient::request`](crate::SessionClient::request) has checked them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Method-specific reply payload.
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: Map<String, Value>,
    /// [`SUCCESS_RESULT`] or a failure description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: String,
    /// Echo of the request's tag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag: Tag,
}

impl ResponseEnvelope {
    /// Decodes a response body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Returns `true` if `result` is the canonical success marker.
    pub fn is_success(&self) -> bool {
        self.result == SUCCESS_RESULT
    }

    /// Decodes the opaque arguments into a method-specific schema.
    pub fn arguments_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.arguments.clone()))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
