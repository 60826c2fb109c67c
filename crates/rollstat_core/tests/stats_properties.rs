//! Property-based tests for the statistics engine.
//!
//! Generates random roll histories and windows, then checks the structural
//! invariants every report must satisfy.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rollstat_core::{compute_report, DateWindow, Roll, StatsError, StatsInput, StatsReport};

// ===========================================================================
// Generators
// ===========================================================================

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Random roll history: add offsets within a year, optional dwell.
fn arb_rolls(max_rolls: usize) -> impl Strategy<Value = Vec<Roll>> {
    proptest::collection::vec(
        (
            0..365i64,
            proptest::option::of(0..200i64),
            1.0..100.0f64,
            1.0..50.0f64,
        ),
        1..=max_rolls,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (added_offset, dwell, weight, length))| {
                let date_added = base_date() + Duration::days(added_offset);
                Roll {
                    id: index as i64 + 1,
                    length,
                    weight,
                    date_added,
                    date_removed: dwell.map(|days| date_added + Duration::days(days)),
                }
            })
            .collect()
    })
}

fn arb_window() -> impl Strategy<Value = DateWindow> {
    (0..365i64, 0..200i64).prop_map(|(start_offset, len)| {
        let start = base_date() + Duration::days(start_offset);
        DateWindow::new(start, start + Duration::days(len)).unwrap()
    })
}

/// Computes a report, or `None` when the window has too little data.
fn report_for(rolls: &[Roll], window: &DateWindow) -> Option<(StatsInput, StatsReport)> {
    let input = StatsInput::from_rolls(rolls, window);
    match compute_report(window, &input) {
        Ok(report) => Some((input, report)),
        Err(StatsError::NoData { .. } | StatsError::InsufficientData { .. }) => None,
        Err(err) => panic!("unexpected stats error: {err}"),
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Count extrema are ordered and bounded by the overlapping set size.
    #[test]
    fn count_extrema_are_ordered_and_bounded(
        rolls in arb_rolls(12),
        window in arb_window(),
    ) {
        let Some((input, report)) = report_for(&rolls, &window) else {
            return Ok(());
        };
        let overlapping = input.overlapping.len() as i64;

        prop_assert!(report.min_count_interval.value <= report.max_count_interval.value);
        prop_assert!(report.min_count_interval.value >= 0);
        prop_assert!(report.max_count_interval.value <= overlapping);
        prop_assert!(report.min_weight_interval.value <= report.max_weight_interval.value);
        prop_assert!(report.min_weight_interval.value >= 0.0);
    }

    /// An empty stock weighs exactly zero, so both minima land on the same range.
    #[test]
    fn empty_stock_minima_coincide(
        rolls in arb_rolls(12),
        window in arb_window(),
    ) {
        let Some((_, report)) = report_for(&rolls, &window) else {
            return Ok(());
        };
        if report.min_count_interval.value != 0 {
            return Ok(());
        }

        prop_assert_eq!(report.min_weight_interval.value, 0.0);
        prop_assert_eq!(report.min_weight_interval.from, report.min_count_interval.from);
        prop_assert_eq!(report.min_weight_interval.to, report.min_count_interval.to);
    }

    /// Every extremum range lies inside the query window.
    #[test]
    fn extremum_ranges_stay_inside_window(
        rolls in arb_rolls(12),
        window in arb_window(),
    ) {
        let Some((_, report)) = report_for(&rolls, &window) else {
            return Ok(());
        };

        let ranges = [
            (report.min_count_interval.from, report.min_count_interval.to),
            (report.max_count_interval.from, report.max_count_interval.to),
            (report.min_weight_interval.from, report.min_weight_interval.to),
            (report.max_weight_interval.from, report.max_weight_interval.to),
        ];
        for (from, to) in ranges {
            prop_assert!(window.start() <= from, "from {from} before {}", window.start());
            prop_assert!(from <= to, "from {from} after to {to}");
            prop_assert!(to <= window.end(), "to {to} after {}", window.end());
        }
    }

    /// Over a window starting at the earliest add, net adds equal stock at the end.
    #[test]
    fn full_history_window_conserves_stock(
        rolls in arb_rolls(12),
        end_offset in 0..600i64,
    ) {
        let window = DateWindow::new(base_date(), base_date() + Duration::days(end_offset)).unwrap();
        let Some((_, report)) = report_for(&rolls, &window) else {
            return Ok(());
        };

        let active_at_end = rolls
            .iter()
            .filter(|roll| roll.date_added <= window.end())
            .filter(|roll| roll.date_removed.map_or(true, |removed| removed > window.end()))
            .count();
        prop_assert_eq!(
            report.added_count as i64 - report.removed_count as i64,
            active_at_end as i64
        );
    }

    /// The engine is a pure function of its snapshot.
    #[test]
    fn repeated_computation_is_identical(
        rolls in arb_rolls(12),
        window in arb_window(),
    ) {
        let input = StatsInput::from_rolls(&rolls, &window);
        let first = compute_report(&window, &input);
        let second = compute_report(&window, &input);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "outcomes diverged"),
        }
    }
}
