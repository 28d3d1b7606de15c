//! Document ledger API server.
//!
//! Opens the pool once, applies pending migrations, and serves the router
//! until Ctrl+C. The pool is closed after the last request drains.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docledger_api::{AppState, create_router};
use docledger_db::migration::{Migrator, MigratorTrait};
use docledger_db::{Repositories, connect};
use docledger_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = Arc::new(
        connect(&config.database)
            .await
            .context("Failed to connect to database")?,
    );
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    Migrator::up(db.as_ref(), None)
        .await
        .context("Failed to apply migrations")?;

    let repos = Repositories::new(Arc::clone(&db), &config.ledger);
    let app = create_router(AppState::new(repos));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        read_deadline_ms = config.ledger.read_deadline_ms,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close_by_ref().await?;
    info!("Database pool closed");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
