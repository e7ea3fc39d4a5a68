//! Rollups across companies and months.

use std::collections::HashMap;

use finsight_shared::types::CompanyId;

use super::result::AggregateResult;
use super::sheet::MetricSheet;
use crate::metrics::{MetricName, Overflow};
use crate::period::PeriodKey;

/// Fetched facts for one request, keyed by company and month.
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    sheets: HashMap<(CompanyId, PeriodKey), MetricSheet>,
}

impl FactTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the sheet for one company and month.
    pub fn insert(&mut self, company_id: CompanyId, period: PeriodKey, sheet: MetricSheet) {
        self.sheets.insert((company_id, period), sheet);
    }

    /// The sheet for one company and month, if fetched.
    #[must_use]
    pub fn get(&self, company_id: CompanyId, period: PeriodKey) -> Option<&MetricSheet> {
        self.sheets.get(&(company_id, period))
    }

    /// Number of company-month sheets held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Returns true if nothing was fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl FromIterator<(CompanyId, PeriodKey, MetricSheet)> for FactTable {
    fn from_iter<T: IntoIterator<Item = (CompanyId, PeriodKey, MetricSheet)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (company_id, period, sheet) in iter {
            table.insert(company_id, period, sheet);
        }
        table
    }
}

/// Sums the input sheets over every (company, period) pair.
///
/// Pairs missing from the table contribute nothing.
pub fn aggregate_sheet(
    table: &FactTable,
    company_ids: &[CompanyId],
    periods: &[PeriodKey],
) -> Result<MetricSheet, Overflow> {
    MetricSheet::sum(
        company_ids
            .iter()
            .flat_map(|c| periods.iter().map(move |p| (*c, *p)))
            .filter_map(|(c, p)| table.get(c, p)),
    )
}

/// Aggregates one metric over the Cartesian product of companies and months.
///
/// One company and many months is a YTD rollup; many companies and one month
/// is a cluster rollup. Derived metrics are evaluated on the summed inputs.
pub fn aggregate(
    table: &FactTable,
    metric: MetricName,
    company_ids: &[CompanyId],
    periods: &[PeriodKey],
) -> Result<AggregateResult, Overflow> {
    Ok(aggregate_sheet(table, company_ids, periods)?.get(metric))
}
