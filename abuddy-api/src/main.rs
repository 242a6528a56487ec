//! abuddy-api - Appliance Buddy REST service
//!
//! Tracks appliances, their warranties and maintenance schedules. Warranty
//! and maintenance statuses are derived from the stored dates on every read.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use abuddy_common::config::{ConfigOverrides, ServerConfig};
use abuddy_common::db::init_database;
use abuddy_common::WarrantyPolicy;
use abuddy_api::identity::provider_from_config;
use abuddy_api::{build_router, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for abuddy-api
#[derive(Parser, Debug)]
#[command(name = "abuddy-api")]
#[command(about = "Appliance Buddy REST API")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ABUDDY_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "ABUDDY_DATABASE")]
    database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "ABUDDY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abuddy_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Appliance Buddy API (abuddy-api) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = ServerConfig::resolve(ConfigOverrides {
        port: args.port,
        database_path: args.database,
        config_file: args.config,
    })
    .context("Failed to load configuration")?;

    info!("Database path: {}", config.database_path.display());
    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let identity =
        provider_from_config(&config.identity).context("Failed to create identity provider")?;
    info!("Identity provider: {}", identity.name());
    info!("Expiring-soon window: {} days", config.expiring_soon_days);

    let state = AppState::new(
        pool,
        Arc::from(identity),
        WarrantyPolicy::new(config.expiring_soon_days),
    )
    .with_frontend_urls(config.frontend_urls.clone());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("abuddy-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
