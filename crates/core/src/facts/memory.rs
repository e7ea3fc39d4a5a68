//! In-memory fact store and company directory.
//!
//! Used by the server binary (loaded from a JSON fixture) and by tests. It
//! stands in for the external fact store; it is not a storage engine.

use std::path::Path;

use dashmap::DashMap;
use finsight_shared::types::{ClusterId, CompanyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::accessor::{FactAccessor, ReferenceData};
use super::error::FactAccessError;
use super::types::{Cluster, Company, FactSheet, FactValue};
use crate::metrics::MetricName;
use crate::period::{PeriodError, PeriodKey};

/// Errors loading a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    /// The fixture is not valid JSON for [`Fixture`].
    #[error("failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),

    /// A company declares an invalid fiscal year start month.
    #[error("company {company_id} has invalid fiscal year start month {month}")]
    InvalidFiscalStart {
        /// Offending company.
        company_id: CompanyId,
        /// Declared month.
        month: u32,
    },

    /// A fact row carries an invalid year or month.
    #[error("fact row has an invalid period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    /// A fact row references a company missing from the fixture.
    #[error("fact row references unknown company {0}")]
    UnknownCompany(CompanyId),
}

/// One submitted metric value in a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactRow {
    /// Company the fact belongs to.
    pub company_id: CompanyId,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Input metric.
    pub metric: MetricName,
    /// Actual amount.
    #[serde(default)]
    pub actual: Option<Decimal>,
    /// Budgeted amount.
    #[serde(default)]
    pub budget: Option<Decimal>,
}

/// Serialized form of a store: the directory plus fact rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    /// Clusters.
    pub clusters: Vec<Cluster>,
    /// Companies.
    pub companies: Vec<Company>,
    /// Fact rows.
    #[serde(default)]
    pub facts: Vec<FactRow>,
}

/// Thread-safe in-memory implementation of [`FactAccessor`] and [`ReferenceData`].
#[derive(Debug, Default)]
pub struct InMemoryFactStore {
    clusters: Vec<Cluster>,
    companies: Vec<Company>,
    facts: DashMap<(CompanyId, PeriodKey), FactSheet>,
}

impl InMemoryFactStore {
    /// Creates a store with a directory and no facts.
    #[must_use]
    pub fn new(clusters: Vec<Cluster>, companies: Vec<Company>) -> Self {
        Self {
            clusters,
            companies,
            facts: DashMap::new(),
        }
    }

    /// Builds a store from a fixture, validating every row.
    ///
    /// Rows for derived metrics are skipped with a warning; derived metrics
    /// are always recomputed from inputs.
    pub fn from_fixture(fixture: Fixture) -> Result<Self, FixtureError> {
        if let Some(company) = fixture
            .companies
            .iter()
            .find(|c| !(1..=12).contains(&c.fiscal_year_start_month))
        {
            return Err(FixtureError::InvalidFiscalStart {
                company_id: company.id,
                month: company.fiscal_year_start_month,
            });
        }

        let store = Self::new(fixture.clusters, fixture.companies);
        for row in fixture.facts {
            if !store.companies.iter().any(|c| c.id == row.company_id) {
                return Err(FixtureError::UnknownCompany(row.company_id));
            }
            let period = PeriodKey::new(row.year, row.month)?;
            if row.metric.is_derived() {
                warn!(metric = %row.metric, company_id = %row.company_id, "Skipping derived metric in fixture");
                continue;
            }
            store.upsert(
                row.company_id,
                period,
                row.metric,
                FactValue {
                    actual: row.actual,
                    budget: row.budget,
                },
            );
        }

        info!(
            clusters = store.clusters.len(),
            companies = store.companies.len(),
            sheets = store.facts.len(),
            "Loaded fact fixture"
        );
        Ok(store)
    }

    /// Reads and loads a JSON fixture file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        let fixture: Fixture = serde_json::from_str(&raw)?;
        Self::from_fixture(fixture)
    }

    /// Records (or replaces) one fact value.
    pub fn upsert(&self, company_id: CompanyId, period: PeriodKey, metric: MetricName, value: FactValue) {
        self.facts
            .entry((company_id, period))
            .or_default()
            .insert(metric, value);
    }
}

impl FactAccessor for InMemoryFactStore {
    async fn get_facts(
        &self,
        company_id: CompanyId,
        period: PeriodKey,
    ) -> Result<FactSheet, FactAccessError> {
        Ok(self
            .facts
            .get(&(company_id, period))
            .map(|sheet| sheet.value().clone())
            .unwrap_or_default())
    }
}

impl ReferenceData for InMemoryFactStore {
    async fn list_clusters(&self) -> Result<Vec<Cluster>, FactAccessError> {
        Ok(self.clusters.clone())
    }

    async fn list_companies(
        &self,
        cluster_id: Option<ClusterId>,
    ) -> Result<Vec<Company>, FactAccessError> {
        Ok(self
            .companies
            .iter()
            .filter(|c| cluster_id.is_none_or(|id| c.cluster_id == id))
            .cloned()
            .collect())
    }
}
