//! Injectable calendar capability for roll lifecycle defaults.
//!
//! # Responsibility
//! - Supply the add date for rolls created without one.
//! - Supply "today" for removals without an explicit date.

use chrono::{Local, NaiveDate};
use rand::Rng;
use std::ops::RangeInclusive;

/// Years accepted as a reference year for default add dates.
pub const REFERENCE_YEARS: RangeInclusive<i32> = 1..=9999;

/// Clamps `year` into [`REFERENCE_YEARS`].
pub fn clamp_reference_year(year: i32) -> i32 {
    year.clamp(*REFERENCE_YEARS.start(), *REFERENCE_YEARS.end())
}

/// Source of default dates used by `RollService`.
pub trait DateProvider {
    /// Add date for a roll created without an explicit date.
    fn default_added_date(&self) -> NaiveDate;
    /// Current calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock provider: random add dates inside `reference_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemDateProvider {
    reference_year: i32,
}

impl SystemDateProvider {
    /// `reference_year` is clamped into [`REFERENCE_YEARS`].
    pub fn new(reference_year: i32) -> Self {
        Self {
            reference_year: clamp_reference_year(reference_year),
        }
    }
}

impl DateProvider for SystemDateProvider {
    fn default_added_date(&self) -> NaiveDate {
        random_date_in_year(self.reference_year, &mut rand::thread_rng())
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Deterministic provider returning the same dates on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDateProvider {
    pub added: NaiveDate,
    pub today: NaiveDate,
}

impl FixedDateProvider {
    pub fn new(added: NaiveDate, today: NaiveDate) -> Self {
        Self { added, today }
    }
}

impl DateProvider for FixedDateProvider {
    fn default_added_date(&self) -> NaiveDate {
        self.added
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

impl<P: DateProvider + ?Sized> DateProvider for &P {
    fn default_added_date(&self) -> NaiveDate {
        (**self).default_added_date()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Picks a uniformly random day of `year`, leap day included.
///
/// `year` is clamped into [`REFERENCE_YEARS`] first.
pub fn random_date_in_year<R: Rng + ?Sized>(year: i32, rng: &mut R) -> NaiveDate {
    let year = clamp_reference_year(year);
    let (Some(first), Some(last)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        // Every year in REFERENCE_YEARS is representable.
        return NaiveDate::default();
    };
    let span = (last - first).num_days();
    let offset = rng.gen_range(0..=span);
    first
        .checked_add_signed(chrono::Duration::days(offset))
        .unwrap_or(last)
}
