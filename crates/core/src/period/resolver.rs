//! Fiscal year-to-date window resolution.

use super::error::PeriodError;
use super::types::{PeriodKey, PeriodWindow};

/// Resolves the YTD window for a company whose fiscal year starts in
/// `fiscal_year_start_month`, ending at (`year`, `month`).
///
/// If the reference month is on or after the start month, the fiscal year
/// began this calendar year; otherwise it began the previous one. The window
/// is chronological and holds between 1 and 12 months.
///
/// The label is `"Apr 2024 – Feb 2025"` when the window crosses a calendar
/// year and `"Jan – Oct 2025"` otherwise.
///
/// # Errors
///
/// Returns `PeriodError` if either month is outside 1-12 or the year is out
/// of range.
pub fn resolve_ytd(
    fiscal_year_start_month: u32,
    year: i32,
    month: u32,
) -> Result<PeriodWindow, PeriodError> {
    if !(1..=12).contains(&fiscal_year_start_month) {
        return Err(PeriodError::InvalidFiscalStartMonth(fiscal_year_start_month));
    }
    let end = PeriodKey::new(year, month)?;

    let start_year = if month >= fiscal_year_start_month {
        year
    } else {
        year - 1
    };
    let start = PeriodKey {
        year: start_year,
        month: fiscal_year_start_month,
    };

    let periods: Vec<PeriodKey> = (start.ordinal()..=end.ordinal())
        .map(PeriodKey::from_ordinal)
        .collect();

    let label = if start.year == end.year {
        format!("{} – {} {}", start.month_abbrev(), end.month_abbrev(), end.year)
    } else {
        format!("{} – {}", start.label(), end.label())
    };

    Ok(PeriodWindow {
        start,
        end,
        periods,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_window_before_fiscal_start_spans_two_years() {
        let window = resolve_ytd(4, 2025, 2).unwrap();

        assert_eq!(window.start, PeriodKey { year: 2024, month: 4 });
        assert_eq!(window.end, PeriodKey { year: 2025, month: 2 });
        assert_eq!(window.len(), 11);
        assert_eq!(window.periods.first(), Some(&window.start));
        assert_eq!(window.periods.last(), Some(&window.end));
        assert_eq!(window.label, "Apr 2024 – Feb 2025");
    }

    #[test]
    fn test_window_after_fiscal_start_stays_in_year() {
        let window = resolve_ytd(4, 2025, 10).unwrap();

        assert_eq!(window.start, PeriodKey { year: 2025, month: 4 });
        assert_eq!(window.len(), 7);
        assert_eq!(window.label, "Apr – Oct 2025");
    }

    #[test]
    fn test_calendar_fiscal_year_is_plain_ytd() {
        let window = resolve_ytd(1, 2025, 10).unwrap();

        assert_eq!(window.start, PeriodKey { year: 2025, month: 1 });
        assert_eq!(window.len(), 10);
        assert_eq!(window.label, "Jan – Oct 2025");
    }

    #[test]
    fn test_reference_month_equal_to_start_is_single_month() {
        let window = resolve_ytd(7, 2025, 7).unwrap();

        assert_eq!(window.periods, vec![PeriodKey { year: 2025, month: 7 }]);
        assert_eq!(window.label, "Jul – Jul 2025");
    }

    #[test]
    fn test_month_before_start_by_one_gives_full_year() {
        let window = resolve_ytd(4, 2025, 3).unwrap();

        assert_eq!(window.len(), 12);
        assert_eq!(window.start, PeriodKey { year: 2024, month: 4 });
    }

    #[rstest]
    #[case(0, 2025, 5, PeriodError::InvalidFiscalStartMonth(0))]
    #[case(13, 2025, 5, PeriodError::InvalidFiscalStartMonth(13))]
    #[case(4, 2025, 0, PeriodError::InvalidMonth(0))]
    #[case(4, 2025, 13, PeriodError::InvalidMonth(13))]
    #[case(4, 10_000, 5, PeriodError::InvalidYear(10_000))]
    fn test_invalid_inputs_rejected(
        #[case] start: u32,
        #[case] year: i32,
        #[case] month: u32,
        #[case] expected: PeriodError,
    ) {
        assert_eq!(resolve_ytd(start, year, month), Err(expected));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Window is contiguous, chronological, 1-12 long, starts on the
        /// fiscal start month and ends on the reference month.
        #[test]
        fn prop_window_shape(
            start_month in 1u32..=12,
            year in 1901i32..=9999,
            month in 1u32..=12,
        ) {
            let window = resolve_ytd(start_month, year, month).unwrap();

            prop_assert!((1..=12).contains(&window.len()));
            prop_assert_eq!(window.start.month, start_month);
            prop_assert_eq!(window.end, PeriodKey { year, month });
            for pair in window.periods.windows(2) {
                prop_assert_eq!(pair[1].ordinal() - pair[0].ordinal(), 1);
            }
            prop_assert!(window.periods.iter().all(|p| window.contains(*p)));
        }
    }
}
