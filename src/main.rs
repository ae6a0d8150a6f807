//! Contact intake webhook service.
//!
//! Main entry point. Loads configuration, opens the SQLite pool, and serves
//! the intake API until a shutdown signal arrives.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use intake_api::{AppState, Config};
use intake_core::SqliteContactStore;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config.rust_log);

    info!(
        database_url = %config.database_url,
        max_connections = config.database_max_connections,
        worker = %config.worker_name,
        "Configuration loaded"
    );

    if !config.has_webhook_secret() {
        warn!("WEBHOOK_SECRET not configured, contact submissions will be rejected");
    }

    let addr = config.parse_server_addr()?;
    let pool = create_database_pool(&config).await?;
    info!("Database connection pool established");

    let state = AppState::new(
        Arc::new(SqliteContactStore::new(pool.clone())),
        config.intake_settings(),
    );

    if let Err(e) = intake_api::start_server(state, addr).await {
        error!(error = %e, "Server failed");
        pool.close().await;
        return Err(e).context("HTTP server failed");
    }

    pool.close().await;
    info!("Database connections closed");

    info!("Intake shutdown complete");
    Ok(())
}

/// Initializes tracing. `RUST_LOG` in the environment wins over the
/// configured level.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{default_filter},intake=debug,intake_api=debug,intake_core=debug,tower_http=debug")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Creates the SQLite connection pool.
///
/// The contacts table is not created here; the first submission creates it.
async fn create_database_pool(config: &Config) -> Result<sqlx::SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_connection_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to create database connection pool")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Failed to verify database connection")?;

    Ok(pool)
}
