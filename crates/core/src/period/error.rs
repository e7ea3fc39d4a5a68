//! Period validation errors.

use thiserror::Error;

/// Invalid period input. Rejected before any fact is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Reference month is outside 1-12.
    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    /// Fiscal year start month is outside 1-12.
    #[error("Invalid fiscal year start month {0}: must be between 1 and 12")]
    InvalidFiscalStartMonth(u32),

    /// Year is outside the supported range.
    #[error("Invalid year {0}: must be between {min} and {max}", min = super::MIN_YEAR, max = super::MAX_YEAR)]
    InvalidYear(i32),
}
