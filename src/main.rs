//! Panel client CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!   CLI command   │                 PANEL CLIENT                 │
//!   ──────────────┼─▶ api::PanelClient (login / status / stubs)  │
//!                 │            │                                 │
//!                 │            ▼                                 │
//!                 │   fallback::FallbackDispatcher               │      candidate 1
//!                 │     snapshot ──▶ transport ─────────────────┼────▶ candidate 2
//!                 │     promote ◀── first completed exchange    │      candidate n
//!                 │            ▲                                 │
//!                 │   config watcher ── replace_all              │
//!                 └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use panel_client::api::{Credentials, PanelClient, SessionToken};
use panel_client::config::watcher::{apply_updates, ConfigWatcher};
use panel_client::config::{load_config, with_candidate_overrides, ClientConfig};
use panel_client::fallback::{FallbackDispatcher, RequestDescriptor};
use panel_client::observability::logging;

#[derive(Parser)]
#[command(name = "panel-client")]
#[command(about = "Panel API client with domain fallback", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Candidate base address, repeatable; replaces the configured list
    #[arg(long = "candidate", global = true)]
    candidates: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Print account status for a session token
    Status {
        #[arg(short, long)]
        token: String,
    },
    /// Send a raw request through the dispatcher
    Request {
        #[arg(long)]
        path: String,
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        /// Header as name=value, repeatable
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
        #[arg(short, long)]
        body: Option<String>,
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Print the effective candidate order
    Candidates,
    /// Follow the config file and apply candidate changes until Ctrl-C
    Watch,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    let config = with_candidate_overrides(config, &cli.candidates)?;

    logging::init(&config.observability)?;

    tracing::info!(
        candidates = ?config.candidates,
        connect_timeout_secs = config.timeouts.connect_secs,
        read_timeout_secs = config.timeouts.read_secs,
        "Configuration loaded"
    );

    let dispatcher = Arc::new(FallbackDispatcher::from_config(&config)?);
    let client = PanelClient::new(Arc::clone(&dispatcher));

    match cli.command {
        Commands::Login { username, password } => {
            let token = client.login(&Credentials::new(username, password)).await?;
            print_json(&json!({ "token": token.as_str() }))?;
        }
        Commands::Status { token } => {
            let status = client.status(&SessionToken::from_raw(token)).await?;
            print_json(&status)?;
        }
        Commands::Request {
            path,
            method,
            headers,
            body,
            content_type,
        } => {
            let mut request = RequestDescriptor::new(method, path).with_headers(headers);
            if let Some(body) = body {
                request = request.with_body(body, content_type.as_deref());
            }
            let exchange = dispatcher.spawn_dispatch(request).await??;
            print_json(&json!({
                "status": exchange.status,
                "body": exchange.body,
                "candidates": dispatcher.candidates().to_vec(),
            }))?;
        }
        Commands::Candidates => {
            print_json(&dispatcher.candidates().to_vec())?;
        }
        Commands::Watch => {
            let path = cli.config.ok_or("watch requires --config")?;
            let (watcher, updates) = ConfigWatcher::new(&path);
            let guard = watcher.run()?;
            let applier = tokio::spawn(apply_updates(Arc::clone(&dispatcher), updates));

            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutdown signal received, stopping watcher");
            drop(guard);
            applier.await?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
