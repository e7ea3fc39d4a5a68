//! KPI request parameters.

use finsight_shared::types::{ClusterId, CompanyId};
use serde::{Deserialize, Serialize};

use super::error::KpiError;
use crate::period::{PeriodError, PeriodKey, ViewMode};

/// Restricts a request to one cluster or one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "id")]
pub enum Scope {
    /// Every company in one cluster.
    Cluster(ClusterId),
    /// A single company.
    Company(CompanyId),
}

/// A dashboard request: view mode, reference month and optional scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiRequest {
    /// Single month or fiscal year-to-date.
    pub mode: ViewMode,
    /// Reference year.
    pub year: i32,
    /// Reference month (1-12).
    pub month: u32,
    /// Optional scope; the whole group when absent.
    #[serde(default)]
    pub scope: Option<Scope>,
}

impl KpiRequest {
    /// Creates a group-wide request.
    #[must_use]
    pub const fn new(mode: ViewMode, year: i32, month: u32) -> Self {
        Self {
            mode,
            year,
            month,
            scope: None,
        }
    }

    /// Restricts the request to `scope`.
    #[must_use]
    pub const fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Builds a request from separate optional cluster and company filters.
    ///
    /// # Errors
    ///
    /// Returns `KpiError::ConflictingScope` if both filters are set.
    pub fn from_filters(
        mode: ViewMode,
        year: i32,
        month: u32,
        cluster_id: Option<ClusterId>,
        company_id: Option<CompanyId>,
    ) -> Result<Self, KpiError> {
        let scope = match (cluster_id, company_id) {
            (Some(_), Some(_)) => return Err(KpiError::ConflictingScope),
            (Some(id), None) => Some(Scope::Cluster(id)),
            (None, Some(id)) => Some(Scope::Company(id)),
            (None, None) => None,
        };
        Ok(Self {
            mode,
            year,
            month,
            scope,
        })
    }

    /// The validated reference month.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError` if the year or month is out of range.
    pub fn period(&self) -> Result<PeriodKey, PeriodError> {
        PeriodKey::new(self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_filters_rejected() {
        let result = KpiRequest::from_filters(
            ViewMode::Month,
            2025,
            1,
            Some(ClusterId::new()),
            Some(CompanyId::new()),
        );
        assert!(matches!(result, Err(KpiError::ConflictingScope)));
    }

    #[test]
    fn test_single_filter_becomes_scope() {
        let cluster_id = ClusterId::new();
        let request =
            KpiRequest::from_filters(ViewMode::Ytd, 2025, 3, Some(cluster_id), None).unwrap();
        assert_eq!(request.scope, Some(Scope::Cluster(cluster_id)));
    }

    #[test]
    fn test_period_validation() {
        assert!(KpiRequest::new(ViewMode::Month, 2025, 13).period().is_err());
        assert!(KpiRequest::new(ViewMode::Month, 1800, 1).period().is_err());
        assert_eq!(
            KpiRequest::new(ViewMode::Month, 2025, 10).period().unwrap(),
            PeriodKey::new(2025, 10).unwrap()
        );
    }
}
