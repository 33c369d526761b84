//! `transmission-rpc` CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: command-line flags, environment variables and
//!    an optional TOML file are merged into a [`rpc::SessionConfig`] and a
//!    [`transport::TransportConfig`].
//! 2. **Wire observability**: configure `tracing-subscriber` (pretty or JSON)
//!    and, when requested, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: build a [`transport::ReqwestTransport`]
//!    and inject it into a [`rpc::SessionClient`].
//! 4. **Send one request** and print the reply arguments (or, with
//!    `--envelope`, the whole reply) as JSON on stdout.

mod args;
mod config;
mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rpc::{RpcError, SessionClient};
use serde_json::Value;
use transport::ReqwestTransport;

use crate::args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match telemetry::init(cli.log_format) {
        Ok(telemetry) => telemetry,
        Err(error) => {
            eprintln!("error: {error:#}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&cli).await;
    telemetry.shutdown();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = config::resolve(cli)?;
    let transport = ReqwestTransport::new(settings.transport)?;
    let client = SessionClient::new(settings.session, Arc::new(transport))?;

    let output = call(&client, cli).await?;
    println!("{output}");
    Ok(())
}

/// Sends the request named on the command line and renders the reply.
async fn call(client: &SessionClient, cli: &Cli) -> anyhow::Result<String> {
    let arguments: Value =
        serde_json::from_str(&cli.arguments).context("method arguments are not valid JSON")?;
    tracing::debug!(url = client.url(), method = %cli.method, "sending request");

    let response = match client.request(&cli.method, &arguments).await {
        Ok(response) => response,
        Err(error) => {
            log_rejected(&error);
            return Err(error).with_context(|| format!("'{}' request failed", cli.method));
        }
    };

    let output = if cli.envelope {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string_pretty(&Value::Object(response.arguments))?
    };
    Ok(output)
}

fn log_rejected(error: &RpcError) {
    if let Some(envelope) = error.response() {
        let arguments = Value::Object(envelope.arguments.clone());
        tracing::error!(
            result = %envelope.result,
            tag = %envelope.tag,
            %arguments,
            "daemon response rejected"
        );
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
