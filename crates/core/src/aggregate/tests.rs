//! Aggregation tests.

use finsight_shared::types::CompanyId;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::facts::{FactSheet, FactValue};
use crate::metrics::{MetricName, Overflow};
use crate::period::PeriodKey;

fn period(month: u32) -> PeriodKey {
    PeriodKey::new(2025, month).unwrap()
}

fn sheet(values: &[(MetricName, Option<Decimal>, Option<Decimal>)]) -> MetricSheet {
    let facts: FactSheet = values
        .iter()
        .map(|(m, actual, budget)| {
            (
                *m,
                FactValue {
                    actual: *actual,
                    budget: *budget,
                },
            )
        })
        .collect();
    MetricSheet::from_facts(&facts).unwrap()
}

fn revenue_gp(revenue: Decimal, gp: Decimal) -> MetricSheet {
    sheet(&[
        (MetricName::Revenue, Some(revenue), Some(revenue)),
        (MetricName::Gp, Some(gp), Some(gp)),
    ])
}

#[test]
fn test_cluster_rollup_sums_companies() {
    let (a, b) = (CompanyId::new(), CompanyId::new());
    let mut table = FactTable::new();
    table.insert(a, period(1), revenue_gp(dec!(100), dec!(40)));
    table.insert(b, period(1), revenue_gp(dec!(300), dec!(60)));

    let result = aggregate(&table, MetricName::Revenue, &[a, b], &[period(1)]).unwrap();

    assert_eq!(result, AggregateResult::new(dec!(400), dec!(400)));
}

#[test]
fn test_ytd_rollup_sums_months() {
    let a = CompanyId::new();
    let table: FactTable = (1..=3)
        .map(|m| (a, period(m), revenue_gp(Decimal::from(m * 100), dec!(10))))
        .collect();

    let periods: Vec<_> = (1..=3).map(period).collect();
    let result = aggregate(&table, MetricName::Revenue, &[a], &periods).unwrap();

    assert_eq!(result.actual, Some(dec!(600)));
}

#[test]
fn test_margin_derived_after_aggregation() {
    let a = CompanyId::new();
    let mut table = FactTable::new();
    table.insert(a, period(1), revenue_gp(dec!(100), dec!(50)));
    table.insert(a, period(2), revenue_gp(dec!(200), dec!(20)));
    table.insert(a, period(3), revenue_gp(dec!(700), dec!(30)));
    let periods = [period(1), period(2), period(3)];

    let ytd = aggregate(&table, MetricName::GpMargin, &[a], &periods).unwrap();
    let summed_monthly: Decimal = periods
        .iter()
        .filter_map(|p| aggregate(&table, MetricName::GpMargin, &[a], &[*p]).unwrap().actual)
        .sum();

    // sum(gp) / sum(revenue) * 100 = 100 / 1000 * 100
    assert_eq!(ytd.actual, Some(dec!(10)));
    assert_ne!(ytd.actual, Some(summed_monthly));
}

#[test]
fn test_all_null_side_stays_null() {
    let a = CompanyId::new();
    let mut table = FactTable::new();
    table.insert(a, period(1), sheet(&[(MetricName::Revenue, None, Some(dec!(50)))]));
    table.insert(a, period(2), sheet(&[(MetricName::Revenue, None, Some(dec!(70)))]));

    let result = aggregate(&table, MetricName::Revenue, &[a], &[period(1), period(2)]).unwrap();

    assert_eq!(result.actual, None);
    assert_eq!(result.budget, Some(dec!(120)));
}

#[test]
fn test_known_zero_is_not_no_data() {
    let a = CompanyId::new();
    let mut table = FactTable::new();
    table.insert(a, period(1), sheet(&[(MetricName::Revenue, Some(Decimal::ZERO), None)]));

    let result = aggregate(&table, MetricName::Revenue, &[a], &[period(1)]).unwrap();

    assert_eq!(result.actual, Some(Decimal::ZERO));
    assert_eq!(result.budget, None);
}

#[test]
fn test_missing_pairs_contribute_nothing() {
    let (a, b) = (CompanyId::new(), CompanyId::new());
    let mut table = FactTable::new();
    table.insert(a, period(1), revenue_gp(dec!(100), dec!(40)));

    let result = aggregate(&table, MetricName::Revenue, &[a, b], &[period(1), period(2)]).unwrap();
    assert_eq!(result.actual, Some(dec!(100)));

    let nothing = aggregate(&table, MetricName::Revenue, &[b], &[period(1)]).unwrap();
    assert_eq!(nothing, AggregateResult::EMPTY);
    assert!(!aggregate_sheet(&table, &[b], &[period(1)]).unwrap().has_data());
}

#[test]
fn test_derived_metrics_from_source_are_ignored() {
    let facts = sheet(&[
        (MetricName::Revenue, Some(dec!(100)), None),
        (MetricName::Gp, Some(dec!(25)), None),
        (MetricName::GpMargin, Some(dec!(99)), None),
    ]);

    assert_eq!(facts.get(MetricName::GpMargin).actual, Some(dec!(25)));
}

fn sum_results(results: &[AggregateResult], metric: MetricName) -> AggregateResult {
    results
        .iter()
        .try_fold(AggregateResult::EMPTY, |acc, r| acc.checked_combine(*r, metric))
        .unwrap()
}

#[test]
fn test_aggregate_result_combine() {
    let total = sum_results(
        &[
            AggregateResult::new(dec!(1), dec!(2)),
            AggregateResult::EMPTY,
            AggregateResult {
                actual: Some(dec!(3)),
                budget: None,
            },
        ],
        MetricName::Revenue,
    );

    assert_eq!(total, AggregateResult::new(dec!(4), dec!(2)));
    assert_eq!(total.variance(), Some(dec!(2)));
}

#[test]
fn test_variance_out_of_range_is_null() {
    let result = AggregateResult::new(Decimal::MAX, Decimal::MIN);
    assert_eq!(result.variance(), None);
}

#[test]
fn test_rollup_overflow_is_reported() {
    let (a, b) = (CompanyId::new(), CompanyId::new());
    let half = Decimal::MAX / dec!(2) + Decimal::ONE;
    let mut table = FactTable::new();
    table.insert(a, period(1), revenue_gp(dec!(1), half));
    table.insert(b, period(1), revenue_gp(dec!(1), half));

    assert_eq!(
        aggregate(&table, MetricName::Revenue, &[a, b], &[period(1)]),
        Err(Overflow { metric: MetricName::Gp })
    );
    // Each company alone is fine.
    assert_eq!(
        aggregate(&table, MetricName::Gp, &[a], &[period(1)]).unwrap().actual,
        Some(half)
    );
}

#[test]
fn test_derived_overflow_in_one_month_is_reported() {
    let facts: FactSheet = [
        (MetricName::Gp, FactValue::new(Decimal::MAX, dec!(1))),
        (MetricName::OtherIncome, FactValue::new(Decimal::MAX, dec!(1))),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        MetricSheet::from_facts(&facts),
        Err(Overflow { metric: MetricName::PbtBeforeNonOps })
    );
}

proptest! {
    /// Derived PBT of a rollup equals the sum of the constituents' derived
    /// PBT, since it is linear in its inputs.
    #[test]
    fn prop_pbt_of_sum_equals_sum_of_pbt(
        rows in prop::collection::vec(
            (-1_000_000i64..1_000_000, -100_000i64..100_000, 0i64..500_000, -50_000i64..50_000),
            1..8,
        ),
    ) {
        let sheets: Vec<MetricSheet> = rows
            .iter()
            .map(|(gp, other, overhead, provisions)| {
                sheet(&[
                    (MetricName::Gp, Some(Decimal::from(*gp)), Some(Decimal::from(*gp))),
                    (MetricName::OtherIncome, Some(Decimal::from(*other)), None),
                    (MetricName::AdminExp, Some(Decimal::from(*overhead)), Some(Decimal::from(*overhead))),
                    (MetricName::Provisions, Some(Decimal::from(*provisions)), None),
                ])
            })
            .collect();

        let total = MetricSheet::sum(&sheets).unwrap().get(MetricName::PbtBeforeNonOps);
        let parts: Vec<AggregateResult> = sheets
            .iter()
            .map(|s| s.get(MetricName::PbtBeforeNonOps))
            .collect();
        let summed = sum_results(&parts, MetricName::PbtBeforeNonOps);

        prop_assert_eq!(total, summed);
    }

    /// Aggregating a margin over months equals sum(gp) / sum(revenue) * 100.
    #[test]
    fn prop_margin_is_ratio_of_sums(
        months in prop::collection::vec((1i64..1_000_000, 0i64..1_000_000), 1..12),
    ) {
        let a = CompanyId::new();
        let table: FactTable = months
            .iter()
            .zip(1u32..)
            .map(|((revenue, gp), m)| {
                (a, period(m), revenue_gp(Decimal::from(*revenue), Decimal::from(*gp)))
            })
            .collect();
        let periods: Vec<_> = (1..=u32::try_from(months.len()).unwrap()).map(period).collect();

        let revenue: Decimal = months.iter().map(|(r, _)| Decimal::from(*r)).sum();
        let gp: Decimal = months.iter().map(|(_, g)| Decimal::from(*g)).sum();
        let expected = gp / revenue * Decimal::ONE_HUNDRED;

        let result = aggregate(&table, MetricName::GpMargin, &[a], &periods).unwrap();
        prop_assert_eq!(result.actual, Some(expected));
    }
}
