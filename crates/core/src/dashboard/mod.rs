//! KPI assembly for the dashboard views.
//!
//! This module provides:
//! - Group overview and cluster contribution
//! - Top and bottom performers
//! - The group → cluster → company drilldown
//! - Per-company metric detail

pub mod error;
pub mod request;
pub mod service;
pub mod types;


pub use error::KpiError;
pub use request::{KpiRequest, Scope};
pub use service::{EngineSettings, KpiService};
pub use types::*;
