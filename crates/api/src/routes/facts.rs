//! Fact cache invalidation.
//!
//! Called by the entry workflow whenever facts for a company and period are
//! resubmitted or approved.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use finsight_core::dashboard::KpiError;
use finsight_core::period::PeriodKey;
use finsight_shared::{AppError, types::CompanyId};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

/// Creates the fact routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/facts/invalidate", post(invalidate_facts))
}

/// Invalidation target. Empty means everything.
#[derive(Debug, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Company whose facts changed.
    pub company_id: Option<CompanyId>,
    /// Year of the changed period; requires `month` and `company_id`.
    pub year: Option<i32>,
    /// Month of the changed period; requires `year` and `company_id`.
    pub month: Option<u32>,
}

async fn invalidate_facts(
    State(state): State<AppState>,
    body: Result<Json<InvalidateRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;

    match (body.company_id, body.year, body.month) {
        (None, None, None) => {
            state.facts.invalidate_all();
            info!("Invalidated all cached facts");
        }
        (Some(company_id), None, None) => {
            state.facts.invalidate_company(company_id);
            info!(company_id = %company_id, "Invalidated cached facts for company");
        }
        (Some(company_id), Some(year), Some(month)) => {
            let period = PeriodKey::new(year, month).map_err(KpiError::from)?;
            state.facts.invalidate(company_id, period).await;
            info!(company_id = %company_id, period = %period, "Invalidated cached facts for period");
        }
        _ => {
            return Err(AppError::Validation(
                "year and month must be given together, along with company_id".to_string(),
            )
            .into());
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use finsight_core::facts::FactValue;
    use finsight_core::metrics::MetricName;
    use finsight_core::period::PeriodKey;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::test_support::{TestApp, get_json, post_json};

    const OVERVIEW: &str = "/api/v1/kpi/overview?mode=month&year=2025&month=1";

    #[tokio::test]
    async fn test_invalidate_period_refreshes_figures() {
        let app = TestApp::new();
        let (_, before) = get_json(&app.router, OVERVIEW).await;
        assert_eq!(before["pbt"]["actual"], "180");

        app.store.upsert(
            app.alpha,
            PeriodKey::new(2025, 1).unwrap(),
            MetricName::Gp,
            FactValue::new(dec!(210), dec!(100)),
        );
        let (_, stale) = get_json(&app.router, OVERVIEW).await;
        assert_eq!(stale["pbt"]["actual"], "180");

        let (status, _) = post_json(
            &app.router,
            "/api/v1/facts/invalidate",
            json!({ "company_id": app.alpha, "year": 2025, "month": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, fresh) = get_json(&app.router, OVERVIEW).await;
        assert_eq!(fresh["pbt"]["actual"], "280");
    }

    #[tokio::test]
    async fn test_invalidate_company_and_all() {
        let app = TestApp::new();
        get_json(&app.router, OVERVIEW).await;
        app.state.facts.run_pending_tasks().await;
        assert_eq!(app.state.facts.entry_count(), 3);

        let (status, _) = post_json(
            &app.router,
            "/api/v1/facts/invalidate",
            json!({ "company_id": app.alpha }),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        app.state.facts.run_pending_tasks().await;
        assert_eq!(app.state.facts.entry_count(), 2);

        let (status, _) = post_json(&app.router, "/api/v1/facts/invalidate", json!({})).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        app.state.facts.run_pending_tasks().await;
        assert_eq!(app.state.facts.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_period_without_company_rejected() {
        let app = TestApp::new();
        let (status, body) = post_json(
            &app.router,
            "/api/v1/facts/invalidate",
            json!({ "year": 2025, "month": 1 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_invalid_period_rejected() {
        let app = TestApp::new();
        let (status, body) = post_json(
            &app.router,
            "/api/v1/facts/invalidate",
            json!({ "company_id": app.alpha, "year": 2025, "month": 0 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}
