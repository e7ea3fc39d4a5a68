//! KPI assembly service.
//!
//! Each request validates its period, resolves the org structure and scope,
//! fetches every needed (company, month) sheet concurrently, then computes
//! synchronously. Cluster figures are sums of company sheets and the group
//! figure is the sum of cluster sheets; derived metrics are evaluated only on
//! those sums. A sum that leaves the `Decimal` range fails the request.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use finsight_shared::config::EngineConfig;
use finsight_shared::types::{ClusterId, CompanyId};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use super::error::KpiError;
use super::request::{KpiRequest, Scope};
use super::types::{
    ClusterContribution, ClusterContributionReport, ClusterNode, CompanyDetail, CompanyNode,
    GroupOverview, MetricLine, NodeFigures, PerformanceHierarchy, Performers, RankedCompany,
    TrendPoint,
};
use crate::aggregate::{AggregateResult, FactTable, MetricSheet, aggregate_sheet};
use crate::facts::{Cluster, Company, FactAccessError, FactAccessor, ReferenceData};
use crate::metrics::MetricName;
use crate::period::{PeriodKey, PeriodWindow, ViewMode, resolve_ytd};
use crate::ranking::Ranking;
use crate::scoring::{AchievementSummary, RiskTier, achievement, contribution};

/// Default per-call fact accessor timeout.
const DEFAULT_FACT_TIMEOUT_MS: u64 = 5000;

/// Default length of the top and bottom performer lists.
const DEFAULT_TOP_N: usize = 5;

/// Tunables for [`KpiService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound on a single fact accessor call.
    pub fact_timeout: Duration,
    /// Length of the top and bottom performer lists.
    pub top_n: usize,
    /// Metric reported as "PBT" and used for ranking.
    pub headline_metric: MetricName,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fact_timeout: Duration::from_millis(DEFAULT_FACT_TIMEOUT_MS),
            top_n: DEFAULT_TOP_N,
            headline_metric: MetricName::DEFAULT_HEADLINE,
        }
    }
}

impl EngineSettings {
    /// Reads the `[engine]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `KpiError::InvalidMetric` if the headline metric is unknown.
    pub fn from_config(config: &EngineConfig) -> Result<Self, KpiError> {
        let headline_metric = config
            .headline_metric
            .parse::<MetricName>()
            .map_err(|e| KpiError::InvalidMetric(e.0))?;

        Ok(Self {
            fact_timeout: Duration::from_millis(config.fact_timeout_ms),
            top_n: config.top_n,
            headline_metric,
        })
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.fact_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// A cluster and its companies.
#[derive(Debug, Clone)]
struct OrgUnit {
    cluster: Cluster,
    companies: Vec<Company>,
}

/// The group's cluster → company structure for one request.
#[derive(Debug, Default)]
struct Org {
    units: Vec<OrgUnit>,
    // Known clusters that have no companies.
    empty: Vec<ClusterId>,
}

impl Org {
    fn build(clusters: Vec<Cluster>, companies: Vec<Company>) -> Self {
        let mut by_cluster: HashMap<ClusterId, Vec<Company>> = HashMap::new();
        for company in companies {
            if !has_valid_fiscal_start(&company) {
                warn!(
                    company_id = %company.id,
                    fiscal_year_start_month = company.fiscal_year_start_month,
                    "Ignoring company with invalid fiscal year start month"
                );
                continue;
            }
            by_cluster.entry(company.cluster_id).or_default().push(company);
        }

        let mut org = Self::default();
        for cluster in clusters {
            if let Some(companies) = by_cluster.remove(&cluster.id) {
                org.units.push(OrgUnit { cluster, companies });
            } else {
                warn!(cluster_id = %cluster.id, cluster_name = %cluster.name, "Skipping cluster with no companies");
                org.empty.push(cluster.id);
            }
        }
        for company in by_cluster.into_values().flatten() {
            warn!(company_id = %company.id, cluster_id = %company.cluster_id, "Ignoring company in unknown cluster");
        }
        org
    }

    /// The cluster a scope points at.
    fn resolve_cluster(&self, scope: Scope) -> Result<ClusterId, KpiError> {
        match scope {
            Scope::Cluster(id) => {
                if self.units.iter().any(|u| u.cluster.id == id) || self.empty.contains(&id) {
                    Ok(id)
                } else {
                    Err(KpiError::ClusterNotFound(id))
                }
            }
            Scope::Company(id) => self
                .units
                .iter()
                .find(|u| u.companies.iter().any(|c| c.id == id))
                .map(|u| u.cluster.id)
                .ok_or(KpiError::CompanyNotFound(id)),
        }
    }

    /// Units restricted to `scope`. A company scope keeps only that company.
    fn scoped(self, scope: Option<Scope>) -> Result<Vec<OrgUnit>, KpiError> {
        let Some(scope) = scope else {
            return Ok(self.units);
        };
        let cluster_id = self.resolve_cluster(scope)?;
        let mut units: Vec<OrgUnit> = self
            .units
            .into_iter()
            .filter(|u| u.cluster.id == cluster_id)
            .collect();
        if let Scope::Company(company_id) = scope {
            for unit in &mut units {
                unit.companies.retain(|c| c.id == company_id);
            }
        }
        Ok(units)
    }
}

fn has_valid_fiscal_start(company: &Company) -> bool {
    (1..=12).contains(&company.fiscal_year_start_month)
}

type Windows = HashMap<CompanyId, PeriodWindow>;

/// The window each company is measured over.
fn resolve_windows(
    units: &[OrgUnit],
    mode: ViewMode,
    period: PeriodKey,
) -> Result<Windows, KpiError> {
    let mut windows = Windows::new();
    for company in units.iter().flat_map(|u| &u.companies) {
        let window = match mode {
            ViewMode::Month => PeriodWindow::single(period),
            ViewMode::Ytd => resolve_ytd(company.fiscal_year_start_month, period.year, period.month)?,
        };
        windows.insert(company.id, window);
    }
    Ok(windows)
}

/// Label shared by every window, if there is one.
fn shared_label(windows: &Windows) -> Option<String> {
    let mut labels = windows.values().map(|w| w.label.as_str());
    let first = labels.next()?;
    labels.all(|l| l == first).then(|| first.to_string())
}

struct CompanyRollup<'a> {
    company: &'a Company,
    sheet: MetricSheet,
}

struct ClusterRollup<'a> {
    unit: &'a OrgUnit,
    companies: Vec<CompanyRollup<'a>>,
    sheet: MetricSheet,
}

/// Company sheets summed over their windows, then into clusters.
///
/// Output order matches `units`.
fn rollup<'a>(
    units: &'a [OrgUnit],
    windows: &Windows,
    table: &FactTable,
) -> Result<Vec<ClusterRollup<'a>>, KpiError> {
    units
        .iter()
        .map(|unit| -> Result<ClusterRollup<'a>, KpiError> {
            let companies = unit
                .companies
                .iter()
                .map(|company| -> Result<CompanyRollup<'a>, KpiError> {
                    let periods = windows
                        .get(&company.id)
                        .map_or(&[][..], |w| w.periods.as_slice());
                    Ok(CompanyRollup {
                        company,
                        sheet: aggregate_sheet(table, &[company.id], periods)?,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let sheet = MetricSheet::sum(companies.iter().map(|c| &c.sheet))?;
            Ok(ClusterRollup {
                unit,
                companies,
                sheet,
            })
        })
        .collect()
}

fn group_sheet(clusters: &[ClusterRollup<'_>]) -> Result<MetricSheet, KpiError> {
    Ok(MetricSheet::sum(clusters.iter().map(|c| &c.sheet))?)
}

fn node_figures(result: AggregateResult) -> NodeFigures {
    let achievement_pct = achievement(result.actual, result.budget);
    NodeFigures {
        actual: result.actual,
        budget: result.budget,
        achievement_pct,
        risk: RiskTier::classify(achievement_pct),
    }
}

fn ranked_company(
    rank: usize,
    unit: &OrgUnit,
    company: &CompanyRollup<'_>,
    achievement_pct: Decimal,
    metric: MetricName,
) -> RankedCompany {
    let result = company.sheet.get(metric);
    RankedCompany {
        rank,
        company_id: company.company.id,
        company_name: company.company.name.clone(),
        cluster_id: unit.cluster.id,
        cluster_name: unit.cluster.name.clone(),
        achievement_pct,
        pbt_actual: result.actual,
        pbt_budget: result.budget,
        variance: result.variance(),
        risk: RiskTier::classify(Some(achievement_pct)),
    }
}

/// Assembles dashboard views from a fact accessor and reference data.
pub struct KpiService<F: FactAccessor, R: ReferenceData> {
    facts: Arc<F>,
    reference: Arc<R>,
    settings: EngineSettings,
}

impl<F: FactAccessor, R: ReferenceData> KpiService<F, R> {
    /// Creates a new KPI service.
    #[must_use]
    pub fn new(facts: Arc<F>, reference: Arc<R>, settings: EngineSettings) -> Self {
        Self {
            facts,
            reference,
            settings,
        }
    }

    /// Headline figures for the group or the requested scope.
    pub async fn group_overview(&self, request: &KpiRequest) -> Result<GroupOverview, KpiError> {
        let period = request.period()?;
        let units = self.load_org().await?.scoped(request.scope)?;
        let windows = resolve_windows(&units, request.mode, period)?;
        let table = self.fetch(&windows).await?;

        let clusters = rollup(&units, &windows, &table)?;
        let group = group_sheet(&clusters)?;
        let headline = self.settings.headline_metric;
        let pbt = group.get(headline);
        let pbt_achievement = AchievementSummary::from_result(pbt, headline.polarity());

        let companies = clusters.iter().flat_map(|c| &c.companies);
        let companies_total = companies.clone().count();
        let companies_reporting = companies.filter(|c| c.sheet.has_data()).count();

        let period_label = match request.mode {
            ViewMode::Month => Some(period.label()),
            ViewMode::Ytd => shared_label(&windows),
        };

        debug!(
            mode = %request.mode,
            period = %period,
            companies_total,
            companies_reporting,
            "Assembled group overview"
        );

        Ok(GroupOverview {
            mode: request.mode,
            period_label,
            revenue: group.get(MetricName::Revenue),
            gp: group.get(MetricName::Gp),
            gp_margin: group.get(MetricName::GpMargin),
            total_overhead: group.get(MetricName::TotalOverhead),
            pbt,
            pbt_achievement,
            pbt_risk: RiskTier::classify(pbt_achievement.achievement_pct),
            companies_total,
            companies_reporting,
        })
    }

    /// Each cluster's share of the group headline metric.
    ///
    /// Shares are always taken of the whole group. A scope only filters
    /// which rows are returned.
    pub async fn cluster_contribution(
        &self,
        request: &KpiRequest,
    ) -> Result<ClusterContributionReport, KpiError> {
        let period = request.period()?;
        let org = self.load_org().await?;
        let focus = request
            .scope
            .map(|scope| org.resolve_cluster(scope))
            .transpose()?;
        let windows = resolve_windows(&org.units, request.mode, period)?;
        let table = self.fetch(&windows).await?;

        let clusters = rollup(&org.units, &windows, &table)?;
        let headline = self.settings.headline_metric;
        let group = group_sheet(&clusters)?.get(headline);
        let contribution_undefined = group.actual.is_none_or(|total| total.is_zero());

        let rows: Vec<ClusterContribution> = clusters
            .iter()
            .filter(|c| focus.is_none_or(|id| c.unit.cluster.id == id))
            .map(|c| {
                let pbt = c.sheet.get(headline);
                let achievement_pct = achievement(pbt.actual, pbt.budget);
                ClusterContribution {
                    cluster_id: c.unit.cluster.id,
                    cluster_name: c.unit.cluster.name.clone(),
                    pbt: pbt.actual,
                    pbt_budget: pbt.budget,
                    pbt_contribution_pct: contribution(pbt.actual, group.actual).pct,
                    pbt_achievement_pct: achievement_pct,
                    risk: RiskTier::classify(achievement_pct),
                    companies: c.companies.len(),
                }
            })
            .collect();

        debug!(
            mode = %request.mode,
            period = %period,
            clusters = rows.len(),
            contribution_undefined,
            "Assembled cluster contribution"
        );

        Ok(ClusterContributionReport {
            mode: request.mode,
            group_pbt_actual: group.actual,
            group_pbt_budget: group.budget,
            contribution_undefined,
            clusters: rows,
        })
    }

    /// Top and bottom companies by headline achievement.
    pub async fn performers(&self, request: &KpiRequest) -> Result<Performers, KpiError> {
        let period = request.period()?;
        let units = self.load_org().await?.scoped(request.scope)?;
        let windows = resolve_windows(&units, request.mode, period)?;
        let table = self.fetch(&windows).await?;

        let clusters = rollup(&units, &windows, &table)?;
        let metric = self.settings.headline_metric;
        let candidates = clusters
            .iter()
            .flat_map(|c| c.companies.iter().map(move |company| (c.unit, company)));
        let ranking = Ranking::build(
            candidates,
            |(_, c)| {
                let result = c.sheet.get(metric);
                achievement(result.actual, result.budget)
            },
            |(_, c)| (c.company.name.to_lowercase(), c.company.id),
        );

        let n = self.settings.top_n;
        let top_performers = ranking
            .top(n)
            .iter()
            .enumerate()
            .map(|(i, r)| ranked_company(i + 1, r.item.0, r.item.1, r.achievement, metric))
            .collect();
        let bottom_performers = ranking
            .bottom(n)
            .into_iter()
            .enumerate()
            .map(|(i, r)| ranked_company(i + 1, r.item.0, r.item.1, r.achievement, metric))
            .collect();

        debug!(
            mode = %request.mode,
            period = %period,
            rated = ranking.rated_count(),
            unrated = ranking.unrated_count(),
            "Assembled performers"
        );

        Ok(Performers {
            mode: request.mode,
            metric,
            top_performers,
            bottom_performers,
            unrated_count: ranking.unrated_count(),
        })
    }

    /// Group → cluster → company tree with month and YTD figures.
    ///
    /// The request mode is ignored; both windows are always returned.
    pub async fn hierarchy(&self, request: &KpiRequest) -> Result<PerformanceHierarchy, KpiError> {
        let period = request.period()?;
        let units = self.load_org().await?.scoped(request.scope)?;
        let month_windows = resolve_windows(&units, ViewMode::Month, period)?;
        let ytd_windows = resolve_windows(&units, ViewMode::Ytd, period)?;
        // Every YTD window ends at the reference month.
        let table = self.fetch(&ytd_windows).await?;

        let month = rollup(&units, &month_windows, &table)?;
        let ytd = rollup(&units, &ytd_windows, &table)?;
        let metric = self.settings.headline_metric;
        let group_month = node_figures(group_sheet(&month)?.get(metric));
        let group_ytd = node_figures(group_sheet(&ytd)?.get(metric));

        let clusters: Vec<ClusterNode> = month
            .iter()
            .zip(&ytd)
            .map(|(m, y)| ClusterNode {
                cluster_id: m.unit.cluster.id,
                cluster_name: m.unit.cluster.name.clone(),
                month: node_figures(m.sheet.get(metric)),
                ytd: node_figures(y.sheet.get(metric)),
                companies: m
                    .companies
                    .iter()
                    .zip(&y.companies)
                    .map(|(cm, cy)| CompanyNode {
                        company_id: cm.company.id,
                        company_name: cm.company.name.clone(),
                        fiscal_year_start_month: cm.company.fiscal_year_start_month,
                        ytd_label: ytd_windows
                            .get(&cm.company.id)
                            .map(|w| w.label.clone())
                            .unwrap_or_default(),
                        month: node_figures(cm.sheet.get(metric)),
                        ytd: node_figures(cy.sheet.get(metric)),
                    })
                    .collect(),
            })
            .collect();

        debug!(period = %period, clusters = clusters.len(), "Assembled performance hierarchy");

        Ok(PerformanceHierarchy {
            metric,
            group_pbt_actual: group_month.actual,
            group_pbt_budget: group_month.budget,
            group_ytd_pbt_actual: group_ytd.actual,
            group_ytd_pbt_budget: group_ytd.budget,
            group_achievement_pct: group_month.achievement_pct,
            group_risk: group_month.risk,
            group_ytd_achievement_pct: group_ytd.achievement_pct,
            group_ytd_risk: group_ytd.risk,
            clusters,
        })
    }

    /// Every metric for one company, month and YTD, plus a monthly trend.
    ///
    /// The request scope is ignored.
    pub async fn company_detail(
        &self,
        company_id: CompanyId,
        request: &KpiRequest,
    ) -> Result<CompanyDetail, KpiError> {
        let period = request.period()?;
        let (clusters, companies) = self.reference_data().await?;
        let company = companies
            .into_iter()
            .find(|c| c.id == company_id)
            .ok_or(KpiError::CompanyNotFound(company_id))?;
        let cluster_name = clusters
            .into_iter()
            .find(|c| c.id == company.cluster_id)
            .map(|c| c.name);
        if !has_valid_fiscal_start(&company) {
            error!(
                company_id = %company.id,
                fiscal_year_start_month = company.fiscal_year_start_month,
                "Company has an invalid fiscal year start month"
            );
            return Err(KpiError::InvalidReferenceData(format!(
                "company {} has fiscal year start month {}",
                company.id, company.fiscal_year_start_month
            )));
        }

        let ytd_window = resolve_ytd(company.fiscal_year_start_month, period.year, period.month)?;
        let windows = Windows::from([(company.id, ytd_window.clone())]);
        let table = self.fetch(&windows).await?;

        let month_sheet = aggregate_sheet(&table, &[company.id], &[period])?;
        let ytd_sheet = aggregate_sheet(&table, &[company.id], &ytd_window.periods)?;
        let metrics = MetricName::ALL
            .into_iter()
            .map(|metric| MetricLine {
                metric,
                month: AchievementSummary::from_result(month_sheet.get(metric), metric.polarity()),
                ytd: AchievementSummary::from_result(ytd_sheet.get(metric), metric.polarity()),
            })
            .collect();

        let headline = self.settings.headline_metric;
        let monthly_trend = ytd_window
            .periods
            .iter()
            .map(|&p| {
                let result = table
                    .get(company.id, p)
                    .map_or(AggregateResult::EMPTY, |sheet| sheet.get(headline));
                TrendPoint {
                    period: p,
                    label: p.label(),
                    actual: result.actual,
                    budget: result.budget,
                    achievement_pct: achievement(result.actual, result.budget),
                }
            })
            .collect();

        let risk_result = match request.mode {
            ViewMode::Month => month_sheet.get(headline),
            ViewMode::Ytd => ytd_sheet.get(headline),
        };

        debug!(company_id = %company.id, period = %period, "Assembled company detail");

        Ok(CompanyDetail {
            company_id: company.id,
            company_name: company.name,
            cluster_id: company.cluster_id,
            cluster_name,
            fiscal_year_start_month: company.fiscal_year_start_month,
            mode: request.mode,
            month_label: period.label(),
            ytd_label: ytd_window.label,
            headline_metric: headline,
            risk: RiskTier::classify(achievement(risk_result.actual, risk_result.budget)),
            metrics,
            monthly_trend,
        })
    }

    async fn reference_data(&self) -> Result<(Vec<Cluster>, Vec<Company>), KpiError> {
        futures::try_join!(
            self.reference.list_clusters(),
            self.reference.list_companies(None)
        )
        .inspect_err(|e| error!(error = %e, "Reference data lookup failed"))
        .map_err(KpiError::from)
    }

    async fn load_org(&self) -> Result<Org, KpiError> {
        let (clusters, companies) = self.reference_data().await?;
        Ok(Org::build(clusters, companies))
    }

    /// Fetches every (company, month) in `windows`, one future per pair.
    async fn fetch(&self, windows: &Windows) -> Result<FactTable, KpiError> {
        let pairs: BTreeSet<(CompanyId, PeriodKey)> = windows
            .iter()
            .flat_map(|(id, w)| w.periods.iter().map(move |p| (*id, *p)))
            .collect();

        let sheets = try_join_all(
            pairs
                .into_iter()
                .map(|(company_id, period)| self.fetch_sheet(company_id, period)),
        )
        .await?;

        Ok(sheets.into_iter().collect())
    }

    async fn fetch_sheet(
        &self,
        company_id: CompanyId,
        period: PeriodKey,
    ) -> Result<(CompanyId, PeriodKey, MetricSheet), KpiError> {
        match tokio::time::timeout(
            self.settings.fact_timeout,
            self.facts.get_facts(company_id, period),
        )
        .await
        {
            Ok(Ok(facts)) => Ok((company_id, period, MetricSheet::from_facts(&facts)?)),
            Ok(Err(e)) => {
                error!(error = %e, company_id = %company_id, period = %period, "Fact fetch failed");
                Err(e.into())
            }
            Err(_) => {
                let timeout_ms = self.settings.timeout_ms();
                error!(company_id = %company_id, period = %period, timeout_ms, "Fact fetch timed out");
                Err(FactAccessError::Timeout {
                    company_id,
                    period,
                    timeout_ms,
                }
                .into())
            }
        }
    }
}
