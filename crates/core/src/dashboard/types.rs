//! Dashboard response types.
//!
//! Every nullable figure is an explicit `Option`; `None` means "no data" or
//! "undefined", never zero.

use finsight_shared::types::{ClusterId, CompanyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateResult;
use crate::metrics::MetricName;
use crate::period::{PeriodKey, ViewMode};
use crate::scoring::{AchievementSummary, RiskTier};

/// Headline figures for the group, or for the requested scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOverview {
    /// View mode the figures were computed for.
    pub mode: ViewMode,
    /// Period label; `None` in YTD mode when companies' windows differ.
    pub period_label: Option<String>,
    /// Revenue.
    pub revenue: AggregateResult,
    /// Gross profit.
    pub gp: AggregateResult,
    /// Gross margin, derived from the summed revenue and GP.
    pub gp_margin: AggregateResult,
    /// Total overhead.
    pub total_overhead: AggregateResult,
    /// Headline profit metric.
    pub pbt: AggregateResult,
    /// Achievement of the headline metric.
    pub pbt_achievement: AchievementSummary,
    /// Risk tier of the headline achievement.
    pub pbt_risk: RiskTier,
    /// Companies in scope.
    pub companies_total: usize,
    /// Companies with at least one submitted figure in the window.
    pub companies_reporting: usize,
}

/// One cluster's share of the group headline metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterContribution {
    /// Cluster ID.
    pub cluster_id: ClusterId,
    /// Cluster name.
    pub cluster_name: String,
    /// Headline actual.
    pub pbt: Option<Decimal>,
    /// Headline budget.
    pub pbt_budget: Option<Decimal>,
    /// Share of the group headline actual, in percent.
    pub pbt_contribution_pct: Decimal,
    /// Achievement of the headline metric.
    pub pbt_achievement_pct: Option<Decimal>,
    /// Risk tier of that achievement.
    pub risk: RiskTier,
    /// Companies in the cluster.
    pub companies: usize,
}

/// Cluster contributions plus the group total they divide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterContributionReport {
    /// View mode the figures were computed for.
    pub mode: ViewMode,
    /// Group headline actual.
    pub group_pbt_actual: Option<Decimal>,
    /// Group headline budget.
    pub group_pbt_budget: Option<Decimal>,
    /// True when the group total is zero or missing; every share is then 0.
    pub contribution_undefined: bool,
    /// One row per cluster in scope.
    pub clusters: Vec<ClusterContribution>,
}

/// A company in a performer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCompany {
    /// 1-based position within its list.
    pub rank: usize,
    /// Company ID.
    pub company_id: CompanyId,
    /// Company name.
    pub company_name: String,
    /// Owning cluster ID.
    pub cluster_id: ClusterId,
    /// Owning cluster name.
    pub cluster_name: String,
    /// Achievement of the ranking metric.
    pub achievement_pct: Decimal,
    /// Actual of the ranking metric.
    pub pbt_actual: Option<Decimal>,
    /// Budget of the ranking metric.
    pub pbt_budget: Option<Decimal>,
    /// `pbt_actual - pbt_budget`.
    pub variance: Option<Decimal>,
    /// Risk tier of the achievement.
    pub risk: RiskTier,
}

/// Best and worst performing companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performers {
    /// View mode the figures were computed for.
    pub mode: ViewMode,
    /// Metric companies were ranked by.
    pub metric: MetricName,
    /// Best first.
    pub top_performers: Vec<RankedCompany>,
    /// Worst first; never overlaps `top_performers`.
    pub bottom_performers: Vec<RankedCompany>,
    /// Companies left out because their achievement is undefined.
    pub unrated_count: usize,
}

/// Headline figures for one node and one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFigures {
    /// Headline actual.
    pub actual: Option<Decimal>,
    /// Headline budget.
    pub budget: Option<Decimal>,
    /// Achievement percentage.
    pub achievement_pct: Option<Decimal>,
    /// Risk tier.
    pub risk: RiskTier,
}

/// A company leaf in the drilldown tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyNode {
    /// Company ID.
    pub company_id: CompanyId,
    /// Company name.
    pub company_name: String,
    /// Fiscal year start month.
    pub fiscal_year_start_month: u32,
    /// The company's own YTD label.
    pub ytd_label: String,
    /// Reference month figures.
    pub month: NodeFigures,
    /// Fiscal YTD figures.
    pub ytd: NodeFigures,
}

/// A cluster in the drilldown tree. Figures are sums of its companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterNode {
    /// Cluster ID.
    pub cluster_id: ClusterId,
    /// Cluster name.
    pub cluster_name: String,
    /// Reference month figures.
    pub month: NodeFigures,
    /// Fiscal YTD figures.
    pub ytd: NodeFigures,
    /// Child companies.
    pub companies: Vec<CompanyNode>,
}

/// Group → cluster → company drilldown for the headline metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceHierarchy {
    /// Metric the tree reports.
    pub metric: MetricName,
    /// Group actual for the reference month.
    pub group_pbt_actual: Option<Decimal>,
    /// Group budget for the reference month.
    pub group_pbt_budget: Option<Decimal>,
    /// Group actual summed over each company's YTD window.
    pub group_ytd_pbt_actual: Option<Decimal>,
    /// Group budget summed over each company's YTD window.
    pub group_ytd_pbt_budget: Option<Decimal>,
    /// Group achievement for the reference month.
    pub group_achievement_pct: Option<Decimal>,
    /// Group risk for the reference month.
    pub group_risk: RiskTier,
    /// Group achievement year to date.
    pub group_ytd_achievement_pct: Option<Decimal>,
    /// Group risk year to date.
    pub group_ytd_risk: RiskTier,
    /// Clusters in scope.
    pub clusters: Vec<ClusterNode>,
}

/// Month and YTD figures for one metric of one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricLine {
    /// Metric.
    pub metric: MetricName,
    /// Reference month.
    pub month: AchievementSummary,
    /// Fiscal year to date.
    pub ytd: AchievementSummary,
}

/// One month of the headline metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Month.
    pub period: PeriodKey,
    /// Display label, e.g. `Oct 2025`.
    pub label: String,
    /// Actual.
    pub actual: Option<Decimal>,
    /// Budget.
    pub budget: Option<Decimal>,
    /// Achievement percentage.
    pub achievement_pct: Option<Decimal>,
}

/// Full metric breakdown for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetail {
    /// Company ID.
    pub company_id: CompanyId,
    /// Company name.
    pub company_name: String,
    /// Owning cluster ID.
    pub cluster_id: ClusterId,
    /// Owning cluster name, if the cluster is known.
    pub cluster_name: Option<String>,
    /// Fiscal year start month.
    pub fiscal_year_start_month: u32,
    /// View mode used for `risk`.
    pub mode: ViewMode,
    /// Reference month label.
    pub month_label: String,
    /// YTD window label.
    pub ytd_label: String,
    /// Metric the risk tier and trend are computed for.
    pub headline_metric: MetricName,
    /// Risk tier of the headline metric in the requested mode.
    pub risk: RiskTier,
    /// Every metric in the catalogue, in presentation order.
    pub metrics: Vec<MetricLine>,
    /// Headline metric month by month across the YTD window.
    pub monthly_trend: Vec<TrendPoint>,
}
