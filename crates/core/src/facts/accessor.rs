//! Collaborator interfaces consumed by the engine.
//!
//! Implemented outside the engine by whatever owns the fact store and the
//! company directory. [`super::InMemoryFactStore`] implements both.

use std::future::Future;

use finsight_shared::types::{ClusterId, CompanyId};

use super::error::FactAccessError;
use super::types::{Cluster, Company, FactSheet};
use crate::period::PeriodKey;

/// Read access to submitted actual/budget facts.
pub trait FactAccessor: Send + Sync {
    /// Returns every fact recorded for `company_id` in `period`.
    ///
    /// An empty sheet is a legal answer meaning nothing was submitted.
    fn get_facts(
        &self,
        company_id: CompanyId,
        period: PeriodKey,
    ) -> impl Future<Output = Result<FactSheet, FactAccessError>> + Send;
}

/// Read access to the company and cluster directory.
pub trait ReferenceData: Send + Sync {
    /// Lists every cluster in the reporting scope.
    fn list_clusters(&self) -> impl Future<Output = Result<Vec<Cluster>, FactAccessError>> + Send;

    /// Lists companies, optionally restricted to one cluster.
    fn list_companies(
        &self,
        cluster_id: Option<ClusterId>,
    ) -> impl Future<Output = Result<Vec<Company>, FactAccessError>> + Send;
}
