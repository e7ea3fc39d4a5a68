//! KPI assembly error types.

use finsight_shared::AppError;
use finsight_shared::types::{ClusterId, CompanyId};
use thiserror::Error;

use crate::facts::FactAccessError;
use crate::metrics::Overflow;
use crate::period::PeriodError;

/// Errors that abort a KPI request.
///
/// Missing data is never an error: it shows up as `null` figures and a
/// `companies_reporting` of zero.
#[derive(Debug, Clone, Error)]
pub enum KpiError {
    /// Requested year or month is malformed.
    #[error("Invalid period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    /// The fact accessor timed out or failed.
    #[error("Fact access failed: {0}")]
    FactAccess(#[from] FactAccessError),

    /// Scoped cluster does not exist.
    #[error("Cluster not found: {0}")]
    ClusterNotFound(ClusterId),

    /// Scoped or requested company does not exist.
    #[error("Company not found: {0}")]
    CompanyNotFound(CompanyId),

    /// Metric name is not in the catalogue.
    #[error("Invalid metric: {0}")]
    InvalidMetric(String),

    /// Both a cluster and a company scope were given.
    #[error("Scope must be a cluster or a company, not both")]
    ConflictingScope,

    /// A rollup left the `Decimal` range.
    #[error("Aggregation failed: {0}")]
    Overflow(#[from] Overflow),

    /// Reference data describes a company the engine cannot measure.
    #[error("Invalid reference data: {0}")]
    InvalidReferenceData(String),
}

impl From<KpiError> for AppError {
    fn from(err: KpiError) -> Self {
        match err {
            KpiError::InvalidPeriod(_) | KpiError::InvalidMetric(_) | KpiError::ConflictingScope => {
                Self::Validation(err.to_string())
            }
            KpiError::ClusterNotFound(_) | KpiError::CompanyNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            KpiError::FactAccess(FactAccessError::Timeout { .. }) => {
                Self::GatewayTimeout(err.to_string())
            }
            KpiError::FactAccess(FactAccessError::Unavailable(_)) => {
                Self::ExternalService(err.to_string())
            }
            KpiError::Overflow(_) | KpiError::InvalidReferenceData(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}
