//! Metric catalogue and derived metric formulas.

pub mod derived;
pub mod name;

pub use derived::{Overflow, evaluate, percent_of, sum_present};
pub use name::{MetricName, Polarity, UnknownMetric};
