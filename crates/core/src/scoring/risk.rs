//! Risk tiers derived from achievement.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Achievement at or above this is low risk.
pub const LOW_RISK_FLOOR: Decimal = dec!(90);
/// Achievement at or above this (and below [`LOW_RISK_FLOOR`]) is medium risk.
pub const MEDIUM_RISK_FLOOR: Decimal = dec!(80);
/// Achievement at or above this (and below [`MEDIUM_RISK_FLOOR`]) is high risk.
pub const HIGH_RISK_FLOOR: Decimal = dec!(70);

/// Risk classification of an entity's performance against plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Achievement >= 90.
    Low,
    /// 80 <= achievement < 90.
    Medium,
    /// 70 <= achievement < 80.
    High,
    /// Achievement < 70.
    Critical,
    /// No achievement could be computed.
    Unrated,
}

impl RiskTier {
    /// Classifies an achievement percentage. Boundaries belong to the better tier.
    #[must_use]
    pub fn classify(achievement: Option<Decimal>) -> Self {
        match achievement {
            None => Self::Unrated,
            Some(a) if a >= LOW_RISK_FLOOR => Self::Low,
            Some(a) if a >= MEDIUM_RISK_FLOOR => Self::Medium,
            Some(a) if a >= HIGH_RISK_FLOOR => Self::High,
            Some(_) => Self::Critical,
        }
    }

    /// Lowercase name as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Unrated => "unrated",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
