//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod facts;
pub mod health;
pub mod kpi;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(kpi::routes())
        .merge(facts::routes())
}
