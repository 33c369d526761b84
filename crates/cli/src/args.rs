//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Send one RPC call to a Transmission daemon and print the reply arguments.
#[derive(Debug, Parser)]
#[command(name = "transmission-rpc", version, about)]
pub struct Cli {
    /// RPC method name, e.g. `session-get` or `torrent-get`.
    pub method: String,

    /// Method arguments as a JSON object.
    #[arg(default_value = "{}")]
    pub arguments: String,

    /// TOML file with connection settings. Flags override its values.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Daemon address (scheme, host, port).
    #[arg(long, short = 'a', env = "TRANSMISSION_RPC_ADDRESS")]
    pub address: Option<String>,

    /// RPC route on the daemon.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Basic-auth login; enables authentication.
    #[arg(long, short = 'u', env = "TRANSMISSION_RPC_USERNAME")]
    pub username: Option<String>,

    /// Basic-auth password.
    #[arg(long, short = 'p', env = "TRANSMISSION_RPC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Delivery attempts per request, including session-token handshakes.
    #[arg(long)]
    pub tries: Option<u32>,

    /// Per-attempt HTTP timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the whole response envelope instead of just its arguments.
    #[arg(long)]
    pub envelope: bool,

    /// Log output format (logs go to stderr).
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}
