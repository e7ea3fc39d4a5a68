//! Actual/budget pair for a metric over some set of companies and months.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::{MetricName, Overflow, sum_present};

/// Summed actual and budget for one metric.
///
/// Each side is the sum of the present constituents, or `None` when every
/// constituent was missing ("no data" is not zero).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Summed actual.
    pub actual: Option<Decimal>,
    /// Summed budget.
    pub budget: Option<Decimal>,
}

impl AggregateResult {
    /// No data on either side.
    pub const EMPTY: Self = Self {
        actual: None,
        budget: None,
    };

    /// Creates a result with both sides present.
    #[must_use]
    pub const fn new(actual: Decimal, budget: Decimal) -> Self {
        Self {
            actual: Some(actual),
            budget: Some(budget),
        }
    }

    /// Adds another result for `metric` side by side.
    pub fn checked_combine(self, other: Self, metric: MetricName) -> Result<Self, Overflow> {
        Ok(Self {
            actual: sum_present(metric, [self.actual, other.actual])?,
            budget: sum_present(metric, [self.budget, other.budget])?,
        })
    }

    /// Returns true if either side carries a value.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.actual.is_some() || self.budget.is_some()
    }

    /// `actual - budget`, when both are present and the difference fits.
    #[must_use]
    pub fn variance(&self) -> Option<Decimal> {
        self.actual?.checked_sub(self.budget?)
    }
}
