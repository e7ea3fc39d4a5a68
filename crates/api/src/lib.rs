//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - KPI dashboard routes over [`finsight_core::dashboard::KpiService`]
//! - The fact cache invalidation endpoint
//! - JSON error responses

pub mod error;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::Router;
use finsight_core::dashboard::{EngineSettings, KpiService};
use finsight_core::facts::{CachedFactAccessor, InMemoryFactStore};
use finsight_shared::config::CacheConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Fact source used by the server: the in-memory store behind the TTL cache.
pub type FactSource = CachedFactAccessor<InMemoryFactStore>;

/// The KPI engine as wired by the server.
pub type Engine = KpiService<FactSource, InMemoryFactStore>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// KPI assembler.
    pub kpi: Arc<Engine>,
    /// Cached fact source, kept for cache invalidation.
    pub facts: Arc<FactSource>,
}

impl AppState {
    /// Wires the engine over `store`, caching facts as `cache` describes.
    #[must_use]
    pub fn new(store: Arc<InMemoryFactStore>, cache: &CacheConfig, settings: EngineSettings) -> Self {
        let facts = Arc::new(CachedFactAccessor::from_config(Arc::clone(&store), cache));
        let kpi = Arc::new(KpiService::new(Arc::clone(&facts), store, settings));
        Self { kpi, facts }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
