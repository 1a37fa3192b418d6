//! Gantry Server - Main entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gantry_api::AppState;
use gantry_auth::{AuthConfig, AuthManager};
use gantry_session::{MemoryStore, SessionStore};
use gantry_session_sqlite::SqliteStore;

#[derive(Parser)]
#[command(name = "gantry-server")]
#[command(about = "Gantry - work package tracking server")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/gantry.toml")]
    config: String,

    /// Enable development mode (in-memory sessions)
    #[arg(long, env = "GANTRY_DEV_MODE")]
    dev: bool,

    /// Server bind address
    #[arg(long, default_value = "127.0.0.1:8090", env = "GANTRY_BIND_ADDRESS")]
    bind: String,

    /// Data directory (session database)
    #[arg(long, default_value = "data", env = "GANTRY_DATA_DIR")]
    data_dir: PathBuf,
}

/// Top-level server configuration file.
#[derive(Debug, Default, Deserialize)]
struct ServerConfig {
    #[serde(default)]
    auth: AuthConfig,

    #[serde(default)]
    session: SessionConfig,
}

#[derive(Debug, Default, Deserialize)]
struct SessionConfig {
    /// Session lifetime in seconds; unset keeps sessions until deleted.
    #[serde(default)]
    ttl_secs: Option<u64>,
}

/// Loads the configuration file merged with `GANTRY_*` environment
/// variables. A missing file falls back to the built-in defaults.
fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    let config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("GANTRY_").split("__"))
        .extract()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting Gantry server...");
    tracing::info!("Bind address: {}", cli.bind);

    let config = load_config(&cli.config)?;
    let ttl = config.session.ttl_secs.map(Duration::from_secs);

    let sessions: Arc<dyn SessionStore> = if cli.dev {
        tracing::warn!("Development mode enabled - sessions are not persisted");
        Arc::new(MemoryStore::new(ttl))
    } else {
        let path = cli.data_dir.join("sessions.db");
        Arc::new(SqliteStore::open(&path, ttl).await?)
    };

    if config.auth.master_account.is_none() {
        tracing::warn!("No master account configured - Basic authentication is disabled");
    }

    let manager = Arc::new(AuthManager::from_config(&config.auth)?);
    let state = AppState::new(manager, sessions, Arc::new(config.auth));

    let app = gantry_api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    tracing::info!("Gantry server started successfully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}
