//! Inclusive calendar date window used by statistics queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Window whose start is after its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWindowError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Display for InvalidWindowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid window: start_date ({}) must be <= end_date ({})",
            self.start, self.end
        )
    }
}

impl Error for InvalidWindowError {}

/// Closed date range `[start, end]`.
///
/// Constructed only through [`DateWindow::new`], so `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidWindowError> {
        if start > end {
            return Err(InvalidWindowError { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns whether a stock-presence interval touches this window.
    ///
    /// `removed = None` means the interval is still open.
    pub fn overlaps(&self, added: NaiveDate, removed: Option<NaiveDate>) -> bool {
        added <= self.end && removed.map_or(true, |removed| removed >= self.start)
    }
}

impl<'de> Deserialize<'de> for DateWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawWindow {
            start: NaiveDate,
            end: NaiveDate,
        }

        let raw = RawWindow::deserialize(deserializer)?;
        DateWindow::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}
