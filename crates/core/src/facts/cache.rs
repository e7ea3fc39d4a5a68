//! Fact sheet caching using Moka.
//!
//! Memoizes sheets per (company, period) so repeated dashboard requests do
//! not hit the fact store again. The entry workflow owns the invalidation
//! signal and must call one of the `invalidate*` methods whenever facts for
//! a company and period are resubmitted or approved.
//!
//! Every invalidation bumps a generation counter first. A miss that started
//! fetching under an older generation never leaves its sheet in the cache, so
//! a fetch racing a resubmission cannot bring the old facts back.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use finsight_shared::config::CacheConfig;
use finsight_shared::types::CompanyId;
use moka::future::Cache;
use tracing::{debug, error};

use super::accessor::FactAccessor;
use super::error::FactAccessError;
use super::types::FactSheet;
use crate::period::PeriodKey;

/// Default cache capacity (number of company-period sheets).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

type SheetKey = (CompanyId, PeriodKey);

/// A [`FactAccessor`] that memoizes another accessor's answers.
///
/// Errors are never cached. A pass-through instance (cache disabled) forwards
/// every call.
pub struct CachedFactAccessor<F> {
    inner: Arc<F>,
    cache: Option<Cache<SheetKey, Arc<FactSheet>>>,
    generation: AtomicU64,
}

impl<F: FactAccessor> CachedFactAccessor<F> {
    /// Creates a cache with default settings.
    ///
    /// Default: 10 000 sheets max, 5 minute TTL.
    #[must_use]
    pub fn new(inner: Arc<F>) -> Self {
        Self::with_config(inner, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(inner: Arc<F>, max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Self {
            inner,
            cache: Some(cache),
            generation: AtomicU64::new(0),
        }
    }

    /// Creates an accessor that forwards every call without caching.
    #[must_use]
    pub fn passthrough(inner: Arc<F>) -> Self {
        Self {
            inner,
            cache: None,
            generation: AtomicU64::new(0),
        }
    }

    /// Builds the accessor described by the `[cache]` configuration section.
    #[must_use]
    pub fn from_config(inner: Arc<F>, config: &CacheConfig) -> Self {
        if config.enabled {
            Self::with_config(inner, config.max_capacity, config.ttl_secs)
        } else {
            Self::passthrough(inner)
        }
    }

    /// Returns true if answers are memoized.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Drops the cached sheet for one company and period.
    pub async fn invalidate(&self, company_id: CompanyId, period: PeriodKey) {
        if let Some(cache) = &self.cache {
            self.bump_generation();
            cache.invalidate(&(company_id, period)).await;
            debug!(company_id = %company_id, period = %period, "Invalidated cached fact sheet");
        }
    }

    /// Drops every cached sheet for one company.
    pub fn invalidate_company(&self, company_id: CompanyId) {
        if let Some(cache) = &self.cache {
            self.bump_generation();
            match cache.invalidate_entries_if(move |key, _| key.0 == company_id) {
                Ok(_) => debug!(company_id = %company_id, "Invalidated cached fact sheets"),
                Err(e) => {
                    // Fall back to dropping everything rather than serving stale facts.
                    error!(error = %e, company_id = %company_id, "Predicate invalidation failed");
                    cache.invalidate_all();
                }
            }
        }
    }

    /// Drops every cached sheet.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            self.bump_generation();
            cache.invalidate_all();
            debug!("Invalidated all cached fact sheets");
        }
    }

    /// Returns the number of sheets currently cached.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.as_ref().map_or(0, Cache::entry_count)
    }

    /// Runs cache maintenance tasks.
    ///
    /// Moka does this in the background; calling it makes pending
    /// invalidations and counts visible immediately.
    pub async fn run_pending_tasks(&self) {
        if let Some(cache) = &self.cache {
            cache.run_pending_tasks().await;
        }
    }
}

impl<F: FactAccessor> FactAccessor for CachedFactAccessor<F> {
    async fn get_facts(
        &self,
        company_id: CompanyId,
        period: PeriodKey,
    ) -> Result<FactSheet, FactAccessError> {
        let Some(cache) = &self.cache else {
            return self.inner.get_facts(company_id, period).await;
        };

        let key = (company_id, period);
        if let Some(sheet) = cache.get(&key).await {
            return Ok((*sheet).clone());
        }

        let started = self.generation.load(Ordering::SeqCst);
        let sheet = self.inner.get_facts(company_id, period).await?;
        if self.generation.load(Ordering::SeqCst) != started {
            debug!(company_id = %company_id, period = %period, "Invalidated during fetch, not caching");
            return Ok(sheet);
        }
        cache.insert(key, Arc::new(sheet.clone())).await;
        // An invalidation that landed between the check and the insert may
        // have run before the insert did.
        if self.generation.load(Ordering::SeqCst) != started {
            cache.invalidate(&key).await;
        }
        Ok(sheet)
    }
}
