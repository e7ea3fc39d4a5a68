//! Sign-aware achievement percentage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateResult;
use crate::metrics::Polarity;

/// Achievement of `actual` against `budget`, where 100 means on plan.
///
/// ```text
/// sign        = budget >= 0 ? +1 : -1
/// achievement = (1 + sign * (actual - budget) / budget) * 100
/// ```
///
/// The sign flip keeps "higher is better than plan" true for negative
/// budgets: beating a planned loss of 100 with a loss of 80 scores 120, the
/// same as beating a profit target of 100 with 120.
///
/// Returns `None` when the budget is missing or zero, the actual is missing,
/// or the result is outside the `Decimal` range.
#[must_use]
pub fn achievement(actual: Option<Decimal>, budget: Option<Decimal>) -> Option<Decimal> {
    let budget = budget.filter(|b| !b.is_zero())?;
    let actual = actual?;

    let sign = if budget.is_sign_negative() {
        Decimal::NEGATIVE_ONE
    } else {
        Decimal::ONE
    };
    let relative = actual.checked_sub(budget)?.checked_div(budget)?;
    Decimal::ONE
        .checked_add(sign * relative)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Achievement, variance and favorability for one actual/budget pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementSummary {
    /// Actual amount.
    pub actual: Option<Decimal>,
    /// Budgeted amount.
    pub budget: Option<Decimal>,
    /// Achievement percentage (100 = on plan).
    pub achievement_pct: Option<Decimal>,
    /// Achievement minus 100: how far above or below plan, in percent.
    pub variance_pct: Option<Decimal>,
    /// Whether the actual is on the good side of budget for this metric.
    pub is_favorable: Option<bool>,
}

impl AchievementSummary {
    /// Summarizes `result` for a metric with the given polarity.
    #[must_use]
    pub fn from_result(result: AggregateResult, polarity: Polarity) -> Self {
        let achievement_pct = achievement(result.actual, result.budget);
        Self {
            actual: result.actual,
            budget: result.budget,
            achievement_pct,
            variance_pct: achievement_pct.and_then(|a| a.checked_sub(Decimal::ONE_HUNDRED)),
            is_favorable: is_favorable(result, polarity),
        }
    }
}

/// On-budget counts as favorable. `None` if either side is missing.
#[must_use]
pub fn is_favorable(result: AggregateResult, polarity: Polarity) -> Option<bool> {
    let (actual, budget) = (result.actual?, result.budget?);
    Some(match polarity {
        Polarity::HigherIsBetter => actual >= budget,
        Polarity::LowerIsBetter => actual <= budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(120), dec!(100), dec!(120))]
    #[case(dec!(-80), dec!(-100), dec!(120))]
    #[case(dec!(80), dec!(100), dec!(80))]
    #[case(dec!(-120), dec!(-100), dec!(80))]
    #[case(dec!(1_100_000), dec!(1_000_000), dec!(110))]
    #[case(dec!(-80_000), dec!(-50_000), dec!(40))]
    #[case(dec!(0), dec!(100), dec!(0))]
    #[case(dec!(50), dec!(-100), dec!(250))]
    fn test_achievement(#[case] actual: Decimal, #[case] budget: Decimal, #[case] expected: Decimal) {
        assert_eq!(achievement(Some(actual), Some(budget)), Some(expected));
    }

    #[test]
    fn test_achievement_undefined() {
        assert_eq!(achievement(Some(dec!(50)), Some(Decimal::ZERO)), None);
        assert_eq!(achievement(Some(dec!(50)), None), None);
        assert_eq!(achievement(None, Some(dec!(50))), None);
    }

    #[test]
    fn test_achievement_out_of_range_is_undefined() {
        assert_eq!(achievement(Some(Decimal::MAX), Some(Decimal::MIN)), None);
        assert_eq!(achievement(Some(Decimal::MAX), Some(dec!(0.0001))), None);
    }

    #[test]
    fn test_summary_for_cost_line() {
        let summary = AchievementSummary::from_result(
            AggregateResult::new(dec!(90), dec!(100)),
            Polarity::LowerIsBetter,
        );

        assert_eq!(summary.achievement_pct, Some(dec!(90)));
        assert_eq!(summary.variance_pct, Some(dec!(-10)));
        assert_eq!(summary.is_favorable, Some(true));
    }

    #[test]
    fn test_summary_without_budget() {
        let summary = AchievementSummary::from_result(
            AggregateResult {
                actual: Some(dec!(10)),
                budget: None,
            },
            Polarity::HigherIsBetter,
        );

        assert_eq!(summary.achievement_pct, None);
        assert_eq!(summary.variance_pct, None);
        assert_eq!(summary.is_favorable, None);
    }

    proptest! {
        /// Beating a negative budget by x% scores the same as beating a
        /// positive budget by x%.
        #[test]
        fn prop_sign_symmetry(
            budget in 1i64..10_000_000,
            actual in -10_000_000i64..10_000_000,
        ) {
            let (budget, actual) = (Decimal::from(budget), Decimal::from(actual));
            let positive = achievement(Some(actual), Some(budget));
            let negative = achievement(Some(-(budget - (actual - budget))), Some(-budget));

            prop_assert_eq!(positive, negative);
        }

        /// Scoring above 100 is the same thing as beating plan, regardless
        /// of the budget's sign.
        #[test]
        fn prop_above_plan_iff_actual_above_budget(
            budget in prop_oneof![-10_000_000i64..-1, 1i64..10_000_000],
            actual in -10_000_000i64..10_000_000,
        ) {
            let (budget, actual) = (Decimal::from(budget), Decimal::from(actual));
            let score = achievement(Some(actual), Some(budget)).unwrap();

            prop_assert_eq!(score >= Decimal::ONE_HUNDRED, actual >= budget);
        }
    }
}
