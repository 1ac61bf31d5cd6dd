// Main entry point for the catalog service

use anyhow::{Context, Result};
use catalog_bus::api::{build_app, AppState};
use catalog_bus::config::Config;
use catalog_bus::lifecycle::{setup_tracing, CatalogSystem};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded");

    let system = CatalogSystem::start(&config).context("Failed to start catalog service")?;

    let app = build_app(
        AppState {
            products: system.product_client.clone(),
        },
        config.auth_token.as_str(),
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    info!("HTTP server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("HTTP server stopped");

    system
        .shutdown()
        .await
        .map_err(anyhow::Error::msg)
        .context("Shutdown failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
