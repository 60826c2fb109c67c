//! Single-pass sweep over a timeline to locate extremal count/weight ranges.
//!
//! After applying event `i`, the running totals hold on
//! `[events[i].date, events[i + 1].date]`, or up to the window end for the
//! last event. Each such range is a candidate for the min and max of both
//! quantities.
//!
//! # Invariants
//! - Comparisons are `<=` / `>=`, so among equal extremal values the latest
//!   range wins.
//! - Every reported range satisfies `window.start <= from <= to <= window.end`.
//! - Each quantity is only compared against its own previous extremum.
//! - The stock weight is a function of the active set alone: an empty stock
//!   weighs exactly `0.0` and equal sets weigh exactly the same.

use super::timeline::{EventKind, TimelineEvent};
use super::{StatsError, StatsResult};
use crate::model::window::DateWindow;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Date range over which a running quantity held an extremal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalExtremum<T> {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub value: T,
}

/// The four extrema produced by one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepExtrema {
    pub min_count: IntervalExtremum<i64>,
    pub max_count: IntervalExtremum<i64>,
    pub min_weight: IntervalExtremum<f64>,
    pub max_weight: IntervalExtremum<f64>,
}

/// Rolls in stock at the current sweep position, as a multiset of weights.
///
/// The total is re-summed from the set in ascending weight order on every
/// read; no running `f64` is carried between events.
#[derive(Default)]
struct ActiveStock {
    count: i64,
    weights: BTreeMap<u64, u32>,
}

impl ActiveStock {
    fn apply(&mut self, event: &TimelineEvent) {
        // Weights are positive, so bit order is numeric order.
        let key = event.weight.to_bits();
        match event.kind {
            EventKind::Add => {
                self.count += 1;
                *self.weights.entry(key).or_default() += 1;
            }
            EventKind::Remove => {
                self.count -= 1;
                if let Some(copies) = self.weights.get_mut(&key) {
                    *copies -= 1;
                    if *copies == 0 {
                        self.weights.remove(&key);
                    }
                }
            }
        }
    }

    fn weight(&self) -> f64 {
        self.weights
            .iter()
            .flat_map(|(bits, copies)| {
                std::iter::repeat(f64::from_bits(*bits)).take(*copies as usize)
            })
            .fold(0.0, |total, weight| total + weight)
    }
}

struct Extrema<T> {
    min: Option<IntervalExtremum<T>>,
    max: Option<IntervalExtremum<T>>,
}

impl<T: Copy + PartialOrd> Extrema<T> {
    fn new() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    fn observe(&mut self, value: T, from: NaiveDate, to: NaiveDate, window_start: NaiveDate) {
        if to < window_start {
            return;
        }
        let candidate = IntervalExtremum { from, to, value };
        if self.min.map_or(true, |min| value <= min.value) {
            self.min = Some(candidate);
        }
        if self.max.map_or(true, |max| value >= max.value) {
            self.max = Some(candidate);
        }
    }

    fn seed(&mut self, extremum: IntervalExtremum<T>) {
        self.min = Some(extremum);
        self.max = Some(extremum);
    }

    fn finish(
        self,
        window_start: NaiveDate,
    ) -> Option<(IntervalExtremum<T>, IntervalExtremum<T>)> {
        let clamp = |mut extremum: IntervalExtremum<T>| {
            extremum.from = extremum.from.max(window_start);
            extremum
        };
        Some((clamp(self.min?), clamp(self.max?)))
    }
}

/// Sweeps `events` (sorted, as built by `build_timeline`) across `window`.
///
/// # Errors
/// - `InsufficientData` when fewer than two events exist.
pub fn sweep_extrema(events: &[TimelineEvent], window: &DateWindow) -> StatsResult<SweepExtrema> {
    if events.len() < 2 {
        return Err(StatsError::InsufficientData {
            events: events.len(),
        });
    }

    let start = window.start();
    let mut count = Extrema::new();
    let mut weight = Extrema::new();
    let mut stock = ActiveStock::default();

    // Stock was empty from the window start until the first event.
    let first = events[0].date;
    if first > start {
        count.seed(IntervalExtremum {
            from: start,
            to: first,
            value: 0,
        });
        weight.seed(IntervalExtremum {
            from: start,
            to: first,
            value: 0.0,
        });
    }

    for (index, event) in events.iter().enumerate() {
        stock.apply(event);

        let to = events
            .get(index + 1)
            .map_or(window.end(), |next| next.date);
        count.observe(stock.count, event.date, to, start);
        weight.observe(stock.weight(), event.date, to, start);
    }

    let (min_count, max_count) = count.finish(start).ok_or(StatsError::InsufficientData {
        events: events.len(),
    })?;
    let (min_weight, max_weight) = weight.finish(start).ok_or(StatsError::InsufficientData {
        events: events.len(),
    })?;

    Ok(SweepExtrema {
        min_count,
        max_count,
        min_weight,
        max_weight,
    })
}
