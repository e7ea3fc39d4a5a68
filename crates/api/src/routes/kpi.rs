//! KPI dashboard routes.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    routing::get,
};
use finsight_core::dashboard::{
    ClusterContributionReport, CompanyDetail, GroupOverview, KpiError, KpiRequest,
    PerformanceHierarchy, Performers,
};
use finsight_core::period::ViewMode;
use finsight_shared::types::{ClusterId, CompanyId};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

/// Creates the KPI routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/kpi/overview", get(get_overview))
        .route("/kpi/contributions", get(get_contributions))
        .route("/kpi/performers", get(get_performers))
        .route("/kpi/hierarchy", get(get_hierarchy))
        .route("/kpi/companies/{company_id}", get(get_company_detail))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters shared by the dashboard views.
#[derive(Debug, Deserialize)]
pub struct KpiQuery {
    /// `month` or `ytd`.
    pub mode: ViewMode,
    /// Reference year.
    pub year: i32,
    /// Reference month (1-12).
    pub month: u32,
    /// Restrict to one cluster.
    pub cluster_id: Option<ClusterId>,
    /// Restrict to one company.
    pub company_id: Option<CompanyId>,
}

impl KpiQuery {
    fn into_request(self) -> Result<KpiRequest, KpiError> {
        KpiRequest::from_filters(
            self.mode,
            self.year,
            self.month,
            self.cluster_id,
            self.company_id,
        )
    }
}

/// Query parameters for a single company.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// `month` or `ytd`.
    pub mode: ViewMode,
    /// Reference year.
    pub year: i32,
    /// Reference month (1-12).
    pub month: u32,
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_overview(
    State(state): State<AppState>,
    query: Result<Query<KpiQuery>, QueryRejection>,
) -> Result<Json<GroupOverview>, ApiError> {
    let request = query?.0.into_request()?;
    Ok(Json(state.kpi.group_overview(&request).await?))
}

async fn get_contributions(
    State(state): State<AppState>,
    query: Result<Query<KpiQuery>, QueryRejection>,
) -> Result<Json<ClusterContributionReport>, ApiError> {
    let request = query?.0.into_request()?;
    Ok(Json(state.kpi.cluster_contribution(&request).await?))
}

async fn get_performers(
    State(state): State<AppState>,
    query: Result<Query<KpiQuery>, QueryRejection>,
) -> Result<Json<Performers>, ApiError> {
    let request = query?.0.into_request()?;
    Ok(Json(state.kpi.performers(&request).await?))
}

async fn get_hierarchy(
    State(state): State<AppState>,
    query: Result<Query<KpiQuery>, QueryRejection>,
) -> Result<Json<PerformanceHierarchy>, ApiError> {
    let request = query?.0.into_request()?;
    Ok(Json(state.kpi.hierarchy(&request).await?))
}

async fn get_company_detail(
    State(state): State<AppState>,
    company_id: Result<Path<CompanyId>, PathRejection>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<CompanyDetail>, ApiError> {
    let Path(company_id) = company_id?;
    let Query(query) = query?;
    let request = KpiRequest::new(query.mode, query.year, query.month);
    Ok(Json(state.kpi.company_detail(company_id, &request).await?))
}
