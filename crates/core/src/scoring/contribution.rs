//! Cluster share of the group total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cluster's share of the group total, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Share in percent. Zero when `undefined` is set.
    pub pct: Decimal,
    /// True when the group total is zero or missing.
    pub undefined: bool,
}

impl Contribution {
    /// Contribution reported when the group total cannot be divided by.
    pub const UNDEFINED: Self = Self {
        pct: Decimal::ZERO,
        undefined: true,
    };
}

/// `cluster / group * 100`, unrounded.
///
/// A missing cluster value contributes zero. A zero or missing group total
/// yields [`Contribution::UNDEFINED`] for every cluster.
#[must_use]
pub fn contribution(cluster: Option<Decimal>, group: Option<Decimal>) -> Contribution {
    let Some(group) = group.filter(|g| !g.is_zero()) else {
        return Contribution::UNDEFINED;
    };
    let pct = cluster
        .unwrap_or_default()
        .checked_div(group)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED));

    match pct {
        Some(pct) => Contribution {
            pct,
            undefined: false,
        },
        None => Contribution::UNDEFINED,
    }
}
