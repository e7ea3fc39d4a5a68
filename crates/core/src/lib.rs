//! KPI aggregation and ranking engine for Finsight.
//!
//! This crate contains pure computation with ZERO web dependencies. It turns
//! per-company monthly actual/budget facts into the figures dashboards show.
//!
//! # Modules
//!
//! - `period` - Period keys and fiscal year-to-date windows
//! - `metrics` - Metric catalogue and derived metric formulas
//! - `facts` - Fact accessor traits, TTL cache, in-memory store
//! - `aggregate` - Company, cluster and YTD rollups
//! - `scoring` - Achievement, contribution and risk
//! - `ranking` - Top and bottom performers
//! - `dashboard` - KPI assembly for each dashboard view

pub mod aggregate;
pub mod dashboard;
pub mod facts;
pub mod metrics;
pub mod period;
pub mod ranking;
pub mod scoring;
