//! Statistics use-case service.
//!
//! # Responsibility
//! - Validate the requested window.
//! - Read one snapshot from the roll store and hand it to the pure engine.
//!
//! # Invariants
//! - Holds no state between requests; repeated calls on an unchanged store
//!   return identical reports.

use crate::model::window::DateWindow;
use crate::repo::roll_repo::RollRepository;
use crate::stats::report::StatsReport;
use crate::stats::{compute_report, StatsError, StatsInput, StatsResult};
use chrono::NaiveDate;
use log::{info, warn};
use std::time::Instant;

/// Statistics facade over a roll repository.
pub struct StatsService<R: RollRepository> {
    repo: R,
}

impl<R: RollRepository> StatsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Computes the report for `[start, end]`.
    ///
    /// # Errors
    /// - `InvalidWindow` when `start > end`.
    /// - `NoData` when no roll was in stock during the window.
    /// - `InsufficientData` when fewer than two add/remove events are visible.
    /// - `Repo` when the store read fails.
    pub fn stats(&self, start: NaiveDate, end: NaiveDate) -> StatsResult<StatsReport> {
        let window = DateWindow::new(start, end)?;
        self.stats_for(&window)
    }

    /// Computes the report for an already validated window.
    pub fn stats_for(&self, window: &DateWindow) -> StatsResult<StatsReport> {
        let started_at = Instant::now();
        let result = self
            .snapshot(window)
            .and_then(|input| compute_report(window, &input));

        match &result {
            Ok(report) => info!(
                "event=stats_compute module=stats status=ok start={} end={} added={} removed={} duration_ms={}",
                window.start(),
                window.end(),
                report.added_count,
                report.removed_count,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=stats_compute module=stats status=error start={} end={} error_code={} duration_ms={}",
                window.start(),
                window.end(),
                error_code(err),
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn snapshot(&self, window: &DateWindow) -> StatsResult<StatsInput> {
        Ok(StatsInput {
            overlapping: self.repo.query_overlapping(window)?,
            added_dates: self.repo.query_added_in(window)?,
            removed_dates: self.repo.query_removed_in(window)?,
        })
    }
}

fn error_code(err: &StatsError) -> &'static str {
    match err {
        StatsError::InvalidWindow(_) => "invalid_window",
        StatsError::NoData { .. } => "no_data",
        StatsError::InsufficientData { .. } => "insufficient_data",
        StatsError::Repo(_) => "repo_failed",
    }
}
