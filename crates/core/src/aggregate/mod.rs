//! Metric aggregation across companies and periods.

pub mod aggregator;
pub mod result;
pub mod sheet;

#[cfg(test)]
mod tests;

pub use aggregator::{FactTable, aggregate, aggregate_sheet};
pub use result::AggregateResult;
pub use sheet::MetricSheet;
