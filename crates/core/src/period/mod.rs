//! Period keys and fiscal year-to-date resolution.
//!
//! Every company carries its own fiscal year start month, so the YTD window
//! for one reference month differs between companies.

pub mod error;
pub mod resolver;
pub mod types;

pub use error::PeriodError;
pub use resolver::resolve_ytd;
pub use types::{PeriodKey, PeriodWindow, ViewMode};

/// Earliest accepted reference year.
pub const MIN_YEAR: i32 = 1900;

/// Latest accepted reference year.
pub const MAX_YEAR: i32 = 9999;
