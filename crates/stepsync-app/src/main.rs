//! # stepsync
//!
//! Stepsync server binary — opens the database, builds the feedback
//! service, and starts the HTTP/WebSocket server.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use stepsync_server::config::ServerConfig;
use stepsync_server::feedback::{FeedbackService, RemoteAnalyzer};
use stepsync_server::server::StepsyncServer;
use stepsync_server::sync::coordinator::SessionCoordinator;
use stepsync_server::sync::registry::ConnectionRegistry;
use stepsync_store::{ConnectionConfig, Store, new_file, new_in_memory};
use tracing_subscriber::EnvFilter;

/// Stepsync server.
#[derive(Parser, Debug)]
#[command(name = "stepsync", about = "Stepsync practice server")]
struct Cli {
    /// Host to bind (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config; 0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database (overrides config; `:memory:` for ephemeral).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Path to a JSON config file.
    #[arg(long)]
    config: Option<String>,
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

fn open_store(db_path: &str) -> Result<Store> {
    let pool = if db_path == ":memory:" {
        new_in_memory(&ConnectionConfig::default()).context("Failed to open in-memory database")?
    } else {
        ensure_parent_dir(std::path::Path::new(db_path))?;
        new_file(db_path, &ConnectionConfig::default())
            .with_context(|| format!("Failed to open database: {db_path}"))?
    };
    {
        let conn = pool.get().context("Failed to get DB connection")?;
        let applied = stepsync_store::migrations::run_migrations(&conn)
            .context("Failed to run migrations")?;
        if applied > 0 {
            tracing::info!(applied, "applied schema migrations");
        }
    }
    Ok(Store::new(pool))
}

/// Remote analyzer if an API key is present, deterministic fallback otherwise.
fn build_feedback_service() -> FeedbackService {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            tracing::info!("OPENAI_API_KEY set — remote dance analysis enabled");
            FeedbackService::new(Box::new(RemoteAnalyzer::new(key)))
        }
        _ => {
            tracing::info!("no OPENAI_API_KEY — using fallback analysis only");
            FeedbackService::fallback_only()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(db_path) = args.db_path {
        config.db_path = db_path.to_string_lossy().into_owned();
    }

    let store = open_store(&config.db_path)?;
    let feedback = Arc::new(build_feedback_service());
    let coordinator = Arc::new(SessionCoordinator::new(Arc::new(ConnectionRegistry::new())));

    let server = Arc::new(StepsyncServer::new(config, store, feedback, coordinator));
    let shutdown = server.shutdown().clone();

    let serve_handle = {
        let server = server.clone();
        tokio::spawn(async move { server.listen().await })
    };

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    shutdown.shutdown();
    serve_handle
        .await
        .context("Server task panicked")?
        .context("Server error")?;

    tracing::info!("Shutdown complete");
    Ok(())
}
