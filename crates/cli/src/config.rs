//! Settings resolution: TOML file first, then flags and environment.
//!
//! Example file:
//!
//! ```toml
//! address = "http://nas.local:9091"
//! endpoint = "/transmission/rpc"
//! tries = 3
//! timeout_secs = 30
//!
//! [credentials]
//! login = "admin"
//! password = "secret"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use rpc::{Credentials, SessionConfig};
use serde::Deserialize;
use transport::TransportConfig;

use crate::args::Cli;

/// Address used when neither the file nor the command line names one.
pub const DEFAULT_ADDRESS: &str = "http://localhost:9091";

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(flatten)]
    session: SessionConfig,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl FileConfig {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// Everything needed to build the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub session: SessionConfig,
    pub transport: TransportConfig,
}

pub fn resolve(cli: &Cli) -> anyhow::Result<Settings> {
    let (mut session, mut timeout_secs) = match &cli.config {
        Some(path) => {
            let file = FileConfig::load(path)?;
            (file.session, file.timeout_secs)
        }
        None => (SessionConfig::new(DEFAULT_ADDRESS), None),
    };

    if let Some(address) = &cli.address {
        session.address = address.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        session.endpoint = endpoint.clone();
    }
    if let Some(tries) = cli.tries {
        session.tries = tries;
    }
    match (&cli.username, &cli.password) {
        (Some(login), password) => {
            session.credentials = Some(Credentials::new(login, password.clone().unwrap_or_default()));
        }
        (None, Some(_)) => bail!("a password was given without a username"),
        (None, None) => {}
    }
    if cli.timeout_secs.is_some() {
        timeout_secs = cli.timeout_secs;
    }

    session.validate().context("invalid connection settings")?;

    Ok(Settings {
        session,
        transport: TransportConfig {
            timeout: timeout_secs.map(Duration::from_secs),
            ..TransportConfig::default()
        },
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
