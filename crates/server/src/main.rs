mod api;
mod bootstrap;
mod health;

use std::time::Duration;

use anyhow::Result;
use shopfront_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use shopfront_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    health::spawn(
        &app.config.server.bind_address,
        app.config.server.health_check_port,
        app.db_pool.clone(),
    )
    .await?;

    let router = api::router(
        app.db_pool.clone(),
        app.config.auth.gateway_secret.clone(),
        app.config.assets.static_dir.clone(),
    );

    tracing::info!(
        event_name = "storefront.server.started",
        correlation_id = "bootstrap",
        "shopfront-server started"
    );

    api::serve(
        &app.config.server.bind_address,
        app.config.server.api_port,
        router,
        Duration::from_secs(app.config.server.graceful_shutdown_secs),
    )
    .await?;

    tracing::info!(
        event_name = "storefront.server.stopping",
        correlation_id = "shutdown",
        "shopfront-server stopping"
    );

    Ok(())
}
