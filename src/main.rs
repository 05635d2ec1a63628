//! # Media Scout CLI (`scout`)
//!
//! The `scout` binary is the primary interface for Media Scout. It runs
//! discovery queries, audits channel access, and starts the HTTP front
//! end.
//!
//! ## Usage
//!
//! ```bash
//! scout --config ./config/scout.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scout search "<query>" --requester <id>` | Gate, search, and print results |
//! | `scout sources [--requester <id>]` | Audit channel permissions and membership |
//! | `scout serve` | Start the HTTP front end |
//!
//! ## Examples
//!
//! ```bash
//! # Check that the service account can see every channel
//! scout sources --config ./config/scout.toml
//!
//! # Run a discovery query as requester 12345
//! scout search "Avengers Endgame" --requester 12345 --config ./config/scout.toml
//!
//! # Serve the HTTP API for a messaging front end
//! scout serve --config ./config/scout.toml
//! ```

mod config;
mod extract;
mod fetch;
mod gate;
mod models;
mod search;
mod server;
mod sources;
#[allow(dead_code)]
mod testing;
mod transport;
mod transport_http;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::models::RequesterId;
use crate::transport_http::HttpGatewayTransport;

/// Media Scout CLI — a gated release-discovery pipeline over connected
/// message archives.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/scout.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "scout",
    about = "Media Scout — gated release discovery over connected message archives",
    version,
    long_about = "Media Scout searches a fixed set of connected channels through an \
    authenticated archive gateway, extracts structured release records from message \
    text, and returns a bounded result list. Every query is access-gated against \
    every channel before any search runs."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Gateway credentials, pipeline limits, the server bind address, and
    /// the ordered channel list are read from this file.
    #[arg(long, global = true, default_value = "./config/scout.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search all connected channels for a release.
    ///
    /// The requester must be a member of every connected channel and the
    /// service account must hold its required permission in every one of
    /// them, otherwise the query is rejected before any search runs.
    Search {
        /// Free-text query.
        query: String,

        /// Requester identity the gate is evaluated for.
        #[arg(long)]
        requester: i64,
    },

    /// List configured channels and their gate status.
    ///
    /// Shows the service account's permission standing per channel. With
    /// `--requester`, also shows that requester's membership — the same
    /// checks the gate runs before a query.
    Sources {
        /// Also check this requester's membership per channel.
        #[arg(long)]
        requester: Option<i64>,
    },

    /// Start the HTTP front end.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// `POST /search`, `GET /help`, and `GET /health`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    let transport = HttpGatewayTransport::new(
        &cfg.gateway,
        Duration::from_secs(cfg.pipeline.rate_limit_fallback_secs),
    )?;

    match cli.command {
        Commands::Search { query, requester } => {
            match search::search(&transport, &cfg, RequesterId(requester), &query).await {
                Ok(outcome) => println!("{}", outcome.render(query.trim())),
                Err(search::SearchError::InvalidQuery) => {
                    println!("❌ Please send a non-empty search query.");
                }
            }
        }
        Commands::Sources { requester } => {
            sources::list_sources(&transport, &cfg, requester.map(RequesterId)).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg, Arc::new(transport)).await?;
        }
    }

    Ok(())
}
