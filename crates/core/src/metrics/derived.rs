//! Derived metric formulas.
//!
//! Derived metrics are evaluated on already-aggregated inputs (one company
//! and month, or any rollup of them). Summing margins across months or
//! companies is never correct; summing the inputs and deriving once is.
//!
//! ```text
//! gp_margin          = gp / revenue * 100                          (null if revenue is 0)
//! total_overhead     = personal + admin + selling + finance + depreciation
//! pbt_before_non_ops = gp + other_income - total_overhead + provisions + exchange_variance
//! np_margin          = pbt_before_non_ops / revenue * 100          (null if revenue is 0)
//! pbt_after_non_ops  = pbt_before_non_ops + non_ops_income - non_ops_exp
//! ebit               = pbt_before_non_ops + finance_exp
//! ebitda             = ebit + depreciation
//! ```
//!
//! Additive formulas treat a missing term as zero; the result is null only
//! when every term is missing. A sum that leaves the `Decimal` range is an
//! [`Overflow`], never a wrapped or partial value.

use rust_decimal::Decimal;
use thiserror::Error;

use super::name::MetricName;

/// A sum for `metric` does not fit in a `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Sum of {metric} is out of range")]
pub struct Overflow {
    /// Metric whose sum overflowed.
    pub metric: MetricName,
}

/// Sums the present values, or returns `Ok(None)` when none is present.
///
/// Distinguishes "known zero" (`Some(0)`) from "no data" (`None`).
pub fn sum_present<I>(metric: MetricName, values: I) -> Result<Option<Decimal>, Overflow>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    let mut total: Option<Decimal> = None;
    for value in values.into_iter().flatten() {
        total = Some(
            total
                .unwrap_or(Decimal::ZERO)
                .checked_add(value)
                .ok_or(Overflow { metric })?,
        );
    }
    Ok(total)
}

/// `numerator / denominator * 100`, or `None` if either side is missing,
/// the denominator is zero, or the result overflows.
#[must_use]
pub fn percent_of(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<Decimal> {
    let (num, den) = (numerator?, denominator?);
    num.checked_div(den)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Evaluates `metric` against one side (actual or budget) of a set of inputs.
///
/// `input` is only ever called with input metrics. Input metrics are passed
/// straight through. An overflow anywhere in the chain fails the whole
/// evaluation, so a derived value never silently drops a term.
pub fn evaluate(
    metric: MetricName,
    input: &dyn Fn(MetricName) -> Option<Decimal>,
) -> Result<Option<Decimal>, Overflow> {
    use MetricName as M;

    match metric {
        M::GpMargin => Ok(percent_of(input(M::Gp), input(M::Revenue))),
        M::TotalOverhead => sum_present(
            metric,
            [
                input(M::PersonalExp),
                input(M::AdminExp),
                input(M::SellingExp),
                input(M::FinanceExp),
                input(M::Depreciation),
            ],
        ),
        M::PbtBeforeNonOps => sum_present(
            metric,
            [
                input(M::Gp),
                input(M::OtherIncome),
                evaluate(M::TotalOverhead, input)?.map(|v| -v),
                input(M::Provisions),
                input(M::ExchangeVariance),
            ],
        ),
        M::NpMargin => Ok(percent_of(evaluate(M::PbtBeforeNonOps, input)?, input(M::Revenue))),
        M::PbtAfterNonOps => sum_present(
            metric,
            [
                evaluate(M::PbtBeforeNonOps, input)?,
                input(M::NonOpsIncome),
                input(M::NonOpsExp).map(|v| -v),
            ],
        ),
        M::Ebit => sum_present(metric, [evaluate(M::PbtBeforeNonOps, input)?, input(M::FinanceExp)]),
        M::Ebitda => sum_present(metric, [evaluate(M::Ebit, input)?, input(M::Depreciation)]),
        input_metric => Ok(input(input_metric)),
    }
}
