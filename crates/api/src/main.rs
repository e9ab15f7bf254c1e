use anyhow::Result;
use domain::services::{Gateway, TimedGateway, UnconfiguredGateway};
use persistence::gateway::PostgresGateway;
use persistence::media::{MediaStoreClient, MediaStoreConfig};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod app;
mod config;
mod error;
mod middleware;
mod routes;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!(
        event_id = %config.event.id,
        "Starting wedding site API v{}",
        env!("CARGO_PKG_VERSION")
    );

    let gateway = connect_gateway(&config).await?;
    let gateway: Arc<dyn Gateway> =
        Arc::new(TimedGateway::new(gateway, config.gateway.timeout()));

    let addr = config.socket_addr()?;
    let app = app::create_app(config, gateway);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Builds the PostgreSQL gateway, or the unconfigured one when no database
/// url is set.
async fn connect_gateway(config: &Config) -> Result<Arc<dyn Gateway>> {
    if !config.database.is_configured() {
        warn!("No database configured, guest submissions will be refused");
        return Ok(Arc::new(UnconfiguredGateway));
    }

    let media_config = MediaStoreConfig::from(&config.media);
    let media = if media_config.is_configured() {
        Some(MediaStoreClient::new(media_config)?)
    } else {
        warn!("No object store configured, photo uploads will be refused");
        None
    };

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    spawn_pool_metrics(pool.clone());

    let gateway = PostgresGateway::new(pool, config.event.id.clone(), media);
    if !config.gifts.is_empty() {
        let upserted = gateway.gifts().upsert_catalog(&config.gifts).await?;
        info!(gifts = upserted, "Gift catalogue synchronised");
    }

    Ok(Arc::new(gateway))
}

fn spawn_pool_metrics(pool: PgPool) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(10));
        loop {
            interval.tick().await;
            persistence::metrics::record_pool_metrics(&pool);
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
