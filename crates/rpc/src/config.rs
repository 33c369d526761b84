//! Connection settings for one daemon instance.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Route the daemon serves RPC on unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "/transmission/rpc";

/// Number of delivery attempts per request, including the attempt spent on
/// the session-token handshake.
pub const DEFAULT_TRIES: u32 = 3;

/// Address, route, credentials, and retry budget for a
/// [`SessionClient`](crate::SessionClient).
///
/// Deserialisable so it can be embedded in a TOML or JSON config file; only
/// `address` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Scheme, host and port, e.g. `http://127.0.0.1:9091`.
    pub address: String,

    /// Route appended to `address`; defaults to [`DEFAULT_ENDPOINT`].
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Basic-auth credentials. Authentication is enabled when present.
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Delivery attempts per request; defaults to [`DEFAULT_TRIES`].
    #[serde(default = "default_tries")]
    pub tries: u32,
}

impl SessionConfig {
    /// Settings for `address` with the default endpoint, no auth and
    /// [`DEFAULT_TRIES`] tries.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            endpoint: default_endpoint(),
            credentials: None,
            tries: DEFAULT_TRIES,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(login, password));
        self
    }

    /// Overrides the try budget. Zero fails [`validate`](Self::validate).
    #[must_use]
    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Full URL requests are posted to.
    pub fn url(&self) -> String {
        format!("{}{}", self.address, self.endpoint)
    }

    /// Checks that the address is non-empty and at least one try is allowed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if self.tries == 0 {
            return Err(ConfigError::ZeroTries);
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_tries() -> u32 {
    DEFAULT_TRIES
}

// ---------------------------------------------------------------------------

/// HTTP basic-auth login and password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// User name.
    pub login: String,
    /// Password; never printed by `Debug`.
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
