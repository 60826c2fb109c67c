//! Interval statistics engine.
//!
//! # Responsibility
//! - Turn a window's roll snapshot into count/weight extrema and summary
//!   figures.
//! - Keep computation pure: `(window, rolls) -> StatsReport`, no retained
//!   state between calls.
//!
//! # Invariants
//! - `NoData` (nothing in stock during the window) is reported before
//!   `InsufficientData` (fewer than two timeline events).
//! - Results are exact functions of the input snapshot.

pub mod report;
pub mod summary;
pub mod sweep;
pub mod timeline;

use crate::model::roll::Roll;
use crate::model::window::{DateWindow, InvalidWindowError};
use crate::repo::roll_repo::RepoError;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

use report::StatsReport;
use summary::summarize;
use sweep::sweep_extrema;
use timeline::build_timeline;

pub type StatsResult<T> = Result<T, StatsError>;

/// Failures of a statistics request.
#[derive(Debug)]
pub enum StatsError {
    /// `start` is after `end`.
    InvalidWindow(InvalidWindowError),
    /// No roll was in stock at any point of the window.
    NoData { start: NaiveDate, end: NaiveDate },
    /// Fewer than two timeline events; extremal ranges are undefined.
    InsufficientData { events: usize },
    /// Roll store read failed.
    Repo(RepoError),
}

impl Display for StatsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow(err) => write!(f, "{err}"),
            Self::NoData { start, end } => {
                write!(f, "no rolls in stock between {start} and {end}")
            }
            Self::InsufficientData { events } => write!(
                f,
                "not enough data for statistics: {events} timeline event(s), need at least 2"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StatsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidWindow(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidWindowError> for StatsError {
    fn from(value: InvalidWindowError) -> Self {
        Self::InvalidWindow(value)
    }
}

impl From<RepoError> for StatsError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Store snapshot a report is computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsInput {
    /// Rolls in stock at any point of the window.
    pub overlapping: Vec<Roll>,
    /// One add date per roll added inside the window.
    pub added_dates: Vec<NaiveDate>,
    /// One removal date per roll removed inside the window.
    pub removed_dates: Vec<NaiveDate>,
}

impl StatsInput {
    /// Derives the snapshot for `window` from an arbitrary roll collection.
    ///
    /// Applies the same filters as the roll store window queries.
    pub fn from_rolls<'a>(rolls: impl IntoIterator<Item = &'a Roll>, window: &DateWindow) -> Self {
        let mut input = Self::default();
        for roll in rolls {
            if window.overlaps(roll.date_added, roll.date_removed) {
                input.overlapping.push(roll.clone());
            }
            if window.contains(roll.date_added) {
                input.added_dates.push(roll.date_added);
            }
            if let Some(removed) = roll.date_removed.filter(|date| window.contains(*date)) {
                input.removed_dates.push(removed);
            }
        }
        input
    }
}

/// Computes the full statistics report for `window`.
///
/// # Errors
/// - `NoData` when `input.overlapping` is empty.
/// - `InsufficientData` when the timeline has fewer than two events.
pub fn compute_report(window: &DateWindow, input: &StatsInput) -> StatsResult<StatsReport> {
    let summary = summarize(
        &input.overlapping,
        &input.added_dates,
        &input.removed_dates,
        window,
    )?;
    let timeline = build_timeline(&input.overlapping, window);
    let extrema = sweep_extrema(&timeline, window)?;
    Ok(StatsReport::assemble(summary, extrema))
}

#[cfg(test)]
mod tests {
    use super::{compute_report, StatsError, StatsInput};
    use crate::model::roll::Roll;
    use crate::model::window::DateWindow;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn roll(id: i64, added: NaiveDate, removed: Option<NaiveDate>) -> Roll {
        Roll {
            id,
            length: 10.0,
            weight: 20.0,
            date_added: added,
            date_removed: removed,
        }
    }

    #[test]
    fn from_rolls_mirrors_store_window_filters() {
        let window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        let rolls = vec![
            roll(1, date(2024, 1, 1), Some(date(2024, 2, 1))),
            roll(2, date(2024, 2, 1), Some(date(2024, 3, 15))),
            roll(3, date(2024, 3, 10), None),
            roll(4, date(2024, 4, 1), None),
        ];

        let input = StatsInput::from_rolls(&rolls, &window);
        let ids: Vec<_> = input.overlapping.iter().map(|roll| roll.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(input.added_dates, vec![date(2024, 3, 10)]);
        assert_eq!(input.removed_dates, vec![date(2024, 3, 15)]);
    }

    #[test]
    fn no_data_takes_precedence_over_insufficient_data() {
        let window = DateWindow::new(date(2023, 1, 1), date(2023, 12, 31)).unwrap();
        let rolls = vec![roll(1, date(2024, 1, 1), None)];

        let err = compute_report(&window, &StatsInput::from_rolls(&rolls, &window)).unwrap_err();
        assert!(matches!(err, StatsError::NoData { .. }));
    }

    #[test]
    fn add_and_remove_inside_window_produce_report() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let rolls = vec![roll(1, date(2024, 2, 1), Some(date(2024, 5, 1)))];

        let report = compute_report(&window, &StatsInput::from_rolls(&rolls, &window)).unwrap();
        assert_eq!(report.added_count, 1);
        assert_eq!(report.removed_count, 1);
        assert_eq!(report.max_count_interval.value, 1);
        assert_eq!(report.max_count_interval.from, date(2024, 2, 1));
        assert_eq!(report.max_count_interval.to, date(2024, 5, 1));
        assert_eq!(report.min_count_interval.value, 0);
        assert_eq!(report.min_count_interval.from, date(2024, 5, 1));
        assert_eq!(report.max_dwell_days, Some(90));
    }
}
