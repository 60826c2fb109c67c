//! Aggregate length/weight figures and dwell times over a window's rolls.

use super::{StatsError, StatsResult};
use crate::model::roll::Roll;
use crate::model::window::DateWindow;
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub added_count: usize,
    pub removed_count: usize,
    pub avg_length: f64,
    pub avg_weight: f64,
    pub max_length: f64,
    pub min_length: f64,
    pub max_weight: f64,
    pub min_weight: f64,
    pub sum_weight: f64,
    pub max_dwell_days: Option<i64>,
    pub min_dwell_days: Option<i64>,
}

/// Summarizes `rolls` (the window's overlapping set).
///
/// `added_dates` / `removed_dates` hold one entry per roll added / removed
/// inside `window`. Dwell time only counts rolls whose add and removal dates
/// both appear in those sets.
///
/// # Errors
/// - `NoData` when `rolls` is empty.
pub fn summarize(
    rolls: &[Roll],
    added_dates: &[NaiveDate],
    removed_dates: &[NaiveDate],
    window: &DateWindow,
) -> StatsResult<SummaryStats> {
    if rolls.is_empty() {
        return Err(StatsError::NoData {
            start: window.start(),
            end: window.end(),
        });
    }

    let added: BTreeSet<NaiveDate> = added_dates.iter().copied().collect();
    let removed: BTreeSet<NaiveDate> = removed_dates.iter().copied().collect();

    let mut sum_length = 0.0;
    let mut sum_weight = 0.0;
    let mut min_length = f64::INFINITY;
    let mut max_length = f64::NEG_INFINITY;
    let mut min_weight = f64::INFINITY;
    let mut max_weight = f64::NEG_INFINITY;
    let mut min_dwell: Option<i64> = None;
    let mut max_dwell: Option<i64> = None;

    for roll in rolls {
        sum_length += roll.length;
        sum_weight += roll.weight;
        min_length = min_length.min(roll.length);
        max_length = max_length.max(roll.length);
        min_weight = min_weight.min(roll.weight);
        max_weight = max_weight.max(roll.weight);

        let dwell = roll
            .date_removed
            .filter(|date_removed| {
                removed.contains(date_removed) && added.contains(&roll.date_added)
            })
            .and_then(|_| roll.dwell_days());
        if let Some(days) = dwell {
            min_dwell = Some(min_dwell.map_or(days, |current| current.min(days)));
            max_dwell = Some(max_dwell.map_or(days, |current| current.max(days)));
        }
    }

    let count = rolls.len() as f64;
    Ok(SummaryStats {
        added_count: added_dates.len(),
        removed_count: removed_dates.len(),
        avg_length: sum_length / count,
        avg_weight: sum_weight / count,
        max_length,
        min_length,
        max_weight,
        min_weight,
        sum_weight,
        max_dwell_days: max_dwell,
        min_dwell_days: min_dwell,
    })
}
