//! LawCorp MCP Server.
//!
//! Implements a stdio-based Model Context Protocol server that exposes the
//! firm's case and document operations to AI agents via JSON-RPC 2.0.
//!
//! # Protocol
//!
//! Reads newline-delimited JSON-RPC 2.0 requests from stdin and writes
//! responses to stdout. Each request and response is a single line.
//!
//! # Caller credentials
//!
//! Each request may carry `params._meta.authorization` (`Bearer <jwt>`).
//! Requests without one fall back to `--bearer-token`. When the config has
//! no `auth` section the server runs in demo mode and every caller acts as
//! the demo partner.

mod args;
mod catalog;
mod filters;
mod server;
mod tools_cases;
mod tools_documents;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;

use lawcorp::config::ServerConfig;
use lawcorp::delegation::bearer_token;

use server::{codes, rpc_error, McpServer};

#[derive(Parser)]
#[command(name = "lawcorp-mcp", version, about = "LawCorp MCP server (stdio)")]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "LAWCORP_CONFIG")]
    config: Option<PathBuf>,

    /// Store file; overrides `store.path` from the configuration
    #[arg(long, env = "LAWCORP_STORE")]
    store: Option<PathBuf>,

    /// Credential for requests that carry none of their own
    #[arg(long, env = "LAWCORP_BEARER_TOKEN", hide_env_values = true)]
    bearer_token: Option<String>,

    /// Log level for stderr output (error, warn, info, debug, trace)
    #[arg(long, env = "LAWCORP_LOG", default_value = "warn")]
    log_level: tracing::Level,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout is reserved for JSON-RPC responses.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level)
        .init();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(store) = cli.store {
        config.store.path = Some(store);
    }
    config.validate()?;

    let default_authorization = cli.bearer_token.map(|token| {
        if bearer_token(&token).is_some() {
            token
        } else {
            format!("Bearer {}", token.trim())
        }
    });
    let server = McpServer::from_config(&config)
        .context("failed to start server")?
        .with_default_authorization(default_authorization);

    serve(&server, io::stdin().lock(), io::stdout());
    Ok(())
}

fn serve(server: &McpServer, input: impl BufRead, stdout: io::Stdout) {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("stdin read error: {e}");
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(trimmed) {
            Ok(request) => server.handle_request(request),
            Err(e) => rpc_error(Value::Null, codes::PARSE_ERROR, format!("parse error: {e}")),
        };

        // Notifications return Value::Null; don't write a response.
        if response.is_null() {
            continue;
        }

        let mut out = stdout.lock();
        if let Err(e) = serde_json::to_writer(&mut out, &response) {
            tracing::error!("failed to write response: {e}");
            break;
        }
        if let Err(e) = out.write_all(b"\n").and_then(|_| out.flush()) {
            tracing::error!("failed to flush stdout: {e}");
            break;
        }
    }
}
