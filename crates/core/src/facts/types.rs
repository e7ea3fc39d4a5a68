//! Reference data and raw fact types.

use std::collections::BTreeMap;

use finsight_shared::types::{ClusterId, CompanyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::MetricName;

/// A reporting company. Immutable reference data for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company ID.
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// The single cluster this company belongs to.
    pub cluster_id: ClusterId,
    /// Month (1-12) in which the company's financial year begins.
    pub fiscal_year_start_month: u32,
}

/// A cluster of companies. Its figures are always derived from its companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster ID.
    pub id: ClusterId,
    /// Display name.
    pub name: String,
}

/// Submitted actual and budget for one metric, company and month.
///
/// Either side may be missing; missing means "not submitted", not zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactValue {
    /// Actual amount.
    #[serde(default)]
    pub actual: Option<Decimal>,
    /// Budgeted amount.
    #[serde(default)]
    pub budget: Option<Decimal>,
}

impl FactValue {
    /// Creates a fact with both sides present.
    #[must_use]
    pub const fn new(actual: Decimal, budget: Decimal) -> Self {
        Self {
            actual: Some(actual),
            budget: Some(budget),
        }
    }
}

/// Every submitted metric for one company and month.
pub type FactSheet = BTreeMap<MetricName, FactValue>;
