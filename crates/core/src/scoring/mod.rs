//! Achievement, contribution and risk scoring.
//!
//! All calculators take optional values and return `None` (or an explicit
//! "undefined" flag) instead of dividing by zero.

pub mod achievement;
pub mod contribution;
pub mod risk;

pub use achievement::{AchievementSummary, achievement, is_favorable};
pub use contribution::{Contribution, contribution};
pub use risk::RiskTier;
