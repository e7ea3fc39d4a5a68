//! Period keys, view modes, and resolved period windows.

use std::fmt;

use chrono::Month;
use serde::{Deserialize, Serialize};

use super::error::PeriodError;
use super::{MAX_YEAR, MIN_YEAR};

/// A calendar month, ordered chronologically.
///
/// The derived ordering (year first, then month) is the same as comparing
/// `year * 12 + month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
}

impl PeriodKey {
    /// Creates a validated period key.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` or `PeriodError::InvalidYear`.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// Months since year zero; consecutive months differ by one.
    #[must_use]
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Inverse of [`PeriodKey::ordinal`].
    #[must_use]
    pub fn from_ordinal(ordinal: i64) -> Self {
        // Ordinals come from validated keys, so the year always fits.
        let year = i32::try_from(ordinal.div_euclid(12)).unwrap_or(i32::MAX);
        let month = u32::try_from(ordinal.rem_euclid(12) + 1).unwrap_or(12);
        Self { year, month }
    }

    /// Three-letter English month abbreviation, e.g. `Oct`.
    #[must_use]
    pub fn month_abbrev(self) -> &'static str {
        month_abbrev(self.month)
    }

    /// Display label, e.g. `Oct 2025`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", self.month_abbrev(), self.year)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub(crate) fn month_abbrev(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("???", |m| &m.name()[..3])
}

/// Dashboard view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The single requested month.
    Month,
    /// Each company's fiscal year-to-date up to the requested month.
    Ytd,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month => write!(f, "month"),
            Self::Ytd => write!(f, "ytd"),
        }
    }
}

/// A chronological run of months with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// First month (inclusive).
    pub start: PeriodKey,
    /// Last month (inclusive), the reference month.
    pub end: PeriodKey,
    /// Every month from `start` to `end`, oldest first.
    pub periods: Vec<PeriodKey>,
    /// Human-readable label.
    pub label: String,
}

impl PeriodWindow {
    /// A window holding exactly one month, labelled like `Oct 2025`.
    #[must_use]
    pub fn single(period: PeriodKey) -> Self {
        Self {
            start: period,
            end: period,
            periods: vec![period],
            label: period.label(),
        }
    }

    /// Number of months in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns true if the window holds no months.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Returns true if `period` falls inside the window.
    #[must_use]
    pub fn contains(&self, period: PeriodKey) -> bool {
        period >= self.start && period <= self.end
    }
}
