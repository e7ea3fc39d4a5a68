//! Input metric sheets that can be summed and then derived.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::result::AggregateResult;
use crate::facts::FactSheet;
use crate::metrics::{MetricName, Overflow, evaluate};

/// Summed input metrics for any set of companies and months.
///
/// Only input metrics are stored. Derived metrics are computed on demand by
/// [`MetricSheet::get`], after aggregation, so margins are never summed.
/// Every constructor that sums checks that all derived metrics stay in the
/// `Decimal` range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSheet {
    inputs: BTreeMap<MetricName, AggregateResult>,
}

impl MetricSheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sheet from one company-month of raw facts.
    ///
    /// Derived metrics present in the raw facts are ignored.
    pub fn from_facts(facts: &FactSheet) -> Result<Self, Overflow> {
        let mut inputs = BTreeMap::new();
        for (metric, value) in facts {
            if metric.is_derived() {
                warn!(metric = %metric, "Ignoring derived metric supplied by fact source");
                continue;
            }
            inputs.insert(
                *metric,
                AggregateResult {
                    actual: value.actual,
                    budget: value.budget,
                },
            );
        }
        Self { inputs }.checked()
    }

    fn absorb(&mut self, other: &Self) -> Result<(), Overflow> {
        for (metric, value) in &other.inputs {
            let slot = self.inputs.entry(*metric).or_default();
            *slot = slot.checked_combine(*value, *metric)?;
        }
        Ok(())
    }

    /// Sums any number of sheets.
    pub fn sum<'a, I>(sheets: I) -> Result<Self, Overflow>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut total = Self::new();
        for sheet in sheets {
            total.absorb(sheet)?;
        }
        total.checked()
    }

    fn checked(self) -> Result<Self, Overflow> {
        for metric in MetricName::ALL.into_iter().filter(|m| m.is_derived()) {
            self.try_get(metric)?;
        }
        Ok(self)
    }

    fn try_get(&self, metric: MetricName) -> Result<AggregateResult, Overflow> {
        if !metric.is_derived() {
            return Ok(self.inputs.get(&metric).copied().unwrap_or_default());
        }
        Ok(AggregateResult {
            actual: evaluate(metric, &|m| self.inputs.get(&m).and_then(|v| v.actual))?,
            budget: evaluate(metric, &|m| self.inputs.get(&m).and_then(|v| v.budget))?,
        })
    }

    /// Actual and budget for `metric`; derived metrics are evaluated per side.
    #[must_use]
    pub fn get(&self, metric: MetricName) -> AggregateResult {
        // Range-checked on construction; a deserialized sheet that overflows
        // reads as no data.
        self.try_get(metric).unwrap_or_default()
    }

    /// Returns true if any input carries an actual or a budget.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.inputs.values().any(AggregateResult::has_data)
    }
}
