//! Fact accessor error types.

use finsight_shared::types::CompanyId;
use thiserror::Error;

use crate::period::PeriodKey;

/// Failures talking to the fact store or reference data source.
#[derive(Debug, Clone, Error)]
pub enum FactAccessError {
    /// The source could not be reached or returned an error.
    #[error("fact source unavailable: {0}")]
    Unavailable(String),

    /// A single fetch exceeded the configured timeout.
    #[error("fact fetch for company {company_id} period {period} timed out after {timeout_ms}ms")]
    Timeout {
        /// Company being fetched.
        company_id: CompanyId,
        /// Period being fetched.
        period: PeriodKey,
        /// Configured timeout.
        timeout_ms: u64,
    },
}

impl FactAccessError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
