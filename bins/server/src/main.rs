//! Finsight API Server
//!
//! Main entry point for the KPI dashboard service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finsight_api::{AppState, create_router};
use finsight_core::dashboard::EngineSettings;
use finsight_core::facts::InMemoryFactStore;
use finsight_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finsight=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    let settings = EngineSettings::from_config(&config.engine)?;
    info!(
        headline_metric = %settings.headline_metric,
        top_n = settings.top_n,
        fact_timeout_ms = config.engine.fact_timeout_ms,
        "Engine configured"
    );

    // Load facts
    let store = InMemoryFactStore::load_json(&config.data.fixture_path)
        .with_context(|| format!("Failed to load fixture {}", config.data.fixture_path))?;
    info!(
        cache_enabled = config.cache.enabled,
        cache_ttl_secs = config.cache.ttl_secs,
        "Fact cache configured"
    );

    // Create application state
    let state = AppState::new(Arc::new(store), &config.cache, settings);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
