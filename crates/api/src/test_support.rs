//! Shared fixtures for route tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use finsight_core::dashboard::EngineSettings;
use finsight_core::facts::{Fixture, InMemoryFactStore};
use finsight_shared::config::CacheConfig;
use finsight_shared::types::{ClusterId, CompanyId};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};

/// A router over a small group.
///
/// January 2025 PBT (through GP): North has Alpha 110/100 (FY Jan) and Bravo
/// 90/100 (FY Apr); South has Charlie -20/10 (FY Jan).
pub(crate) struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryFactStore>,
    pub north: ClusterId,
    pub alpha: CompanyId,
}

impl TestApp {
    pub fn new() -> Self {
        let (north, south) = (ClusterId::new(), ClusterId::new());
        let (alpha, bravo, charlie) = (CompanyId::new(), CompanyId::new(), CompanyId::new());

        let fixture: Fixture = serde_json::from_value(json!({
            "clusters": [
                { "id": north, "name": "North" },
                { "id": south, "name": "South" },
            ],
            "companies": [
                { "id": alpha, "name": "Alpha", "cluster_id": north, "fiscal_year_start_month": 1 },
                { "id": bravo, "name": "Bravo", "cluster_id": north, "fiscal_year_start_month": 4 },
                { "id": charlie, "name": "Charlie", "cluster_id": south, "fiscal_year_start_month": 1 },
            ],
            "facts": [
                { "company_id": alpha, "year": 2025, "month": 1, "metric": "gp", "actual": "110", "budget": "100" },
                { "company_id": bravo, "year": 2025, "month": 1, "metric": "gp", "actual": "90", "budget": "100" },
                { "company_id": charlie, "year": 2025, "month": 1, "metric": "gp", "actual": "-20", "budget": "10" },
            ],
        }))
        .unwrap();

        let store = Arc::new(InMemoryFactStore::from_fixture(fixture).unwrap());
        let state = AppState::new(
            Arc::clone(&store),
            &CacheConfig::default(),
            EngineSettings::default(),
        );

        Self {
            router: create_router(state.clone()),
            state,
            store,
            north,
            alpha,
        }
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub(crate) async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

pub(crate) async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}
