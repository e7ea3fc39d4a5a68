//! Financial line item catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier for a financial line item.
///
/// Input metrics are submitted per company and month. Derived metrics are
/// always computed from inputs, see [`super::derived`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// Revenue.
    Revenue,
    /// Gross profit.
    Gp,
    /// Gross profit as a percentage of revenue (derived).
    GpMargin,
    /// Other operating income.
    OtherIncome,
    /// Personnel expenses.
    PersonalExp,
    /// Administrative expenses.
    AdminExp,
    /// Selling and distribution expenses.
    SellingExp,
    /// Finance expenses.
    FinanceExp,
    /// Depreciation.
    Depreciation,
    /// Sum of the five overhead lines (derived).
    TotalOverhead,
    /// Provisions (signed).
    Provisions,
    /// Exchange gain or loss (signed).
    ExchangeVariance,
    /// Profit before tax, before non-operating items (derived).
    PbtBeforeNonOps,
    /// PBT before non-operating items as a percentage of revenue (derived).
    NpMargin,
    /// Non-operating expenses.
    NonOpsExp,
    /// Non-operating income.
    NonOpsIncome,
    /// Profit before tax after non-operating items (derived).
    PbtAfterNonOps,
    /// Earnings before interest and tax (derived).
    Ebit,
    /// Earnings before interest, tax, depreciation and amortisation (derived).
    Ebitda,
}

/// Whether a higher actual than budget is good news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Income and profit lines.
    HigherIsBetter,
    /// Cost lines.
    LowerIsBetter,
}

impl MetricName {
    /// Every metric in presentation order.
    pub const ALL: [Self; 19] = [
        Self::Revenue,
        Self::Gp,
        Self::GpMargin,
        Self::OtherIncome,
        Self::PersonalExp,
        Self::AdminExp,
        Self::SellingExp,
        Self::FinanceExp,
        Self::Depreciation,
        Self::TotalOverhead,
        Self::Provisions,
        Self::ExchangeVariance,
        Self::PbtBeforeNonOps,
        Self::NpMargin,
        Self::NonOpsExp,
        Self::NonOpsIncome,
        Self::PbtAfterNonOps,
        Self::Ebit,
        Self::Ebitda,
    ];

    /// Metrics that are persisted by the entry workflow.
    pub const INPUTS: [Self; 12] = [
        Self::Revenue,
        Self::Gp,
        Self::OtherIncome,
        Self::PersonalExp,
        Self::AdminExp,
        Self::SellingExp,
        Self::FinanceExp,
        Self::Depreciation,
        Self::Provisions,
        Self::ExchangeVariance,
        Self::NonOpsExp,
        Self::NonOpsIncome,
    ];

    /// The metric dashboards call "PBT" unless configured otherwise.
    pub const DEFAULT_HEADLINE: Self = Self::PbtBeforeNonOps;

    /// Returns true for metrics computed from inputs.
    #[must_use]
    pub const fn is_derived(self) -> bool {
        matches!(
            self,
            Self::GpMargin
                | Self::TotalOverhead
                | Self::PbtBeforeNonOps
                | Self::NpMargin
                | Self::PbtAfterNonOps
                | Self::Ebit
                | Self::Ebitda
        )
    }

    /// Direction in which a variance is favorable.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::PersonalExp
            | Self::AdminExp
            | Self::SellingExp
            | Self::FinanceExp
            | Self::Depreciation
            | Self::TotalOverhead
            | Self::NonOpsExp => Polarity::LowerIsBetter,
            _ => Polarity::HigherIsBetter,
        }
    }

    /// Wire name, e.g. `pbt_before_non_ops`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Gp => "gp",
            Self::GpMargin => "gp_margin",
            Self::OtherIncome => "other_income",
            Self::PersonalExp => "personal_exp",
            Self::AdminExp => "admin_exp",
            Self::SellingExp => "selling_exp",
            Self::FinanceExp => "finance_exp",
            Self::Depreciation => "depreciation",
            Self::TotalOverhead => "total_overhead",
            Self::Provisions => "provisions",
            Self::ExchangeVariance => "exchange_variance",
            Self::PbtBeforeNonOps => "pbt_before_non_ops",
            Self::NpMargin => "np_margin",
            Self::NonOpsExp => "non_ops_exp",
            Self::NonOpsIncome => "non_ops_income",
            Self::PbtAfterNonOps => "pbt_after_non_ops",
            Self::Ebit => "ebit",
            Self::Ebitda => "ebitda",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown metric name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown metric: {0}")]
pub struct UnknownMetric(pub String);

impl FromStr for MetricName {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}
