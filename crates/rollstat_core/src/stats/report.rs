//! Statistics report assembled from summary figures and sweep extrema.

use super::summary::SummaryStats;
use super::sweep::{IntervalExtremum, SweepExtrema};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Response shape for one statistics query. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
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
    pub min_count_interval: IntervalExtremum<i64>,
    pub max_count_interval: IntervalExtremum<i64>,
    pub min_weight_interval: IntervalExtremum<f64>,
    pub max_weight_interval: IntervalExtremum<f64>,
}

impl StatsReport {
    pub fn assemble(summary: SummaryStats, extrema: SweepExtrema) -> Self {
        Self {
            added_count: summary.added_count,
            removed_count: summary.removed_count,
            avg_length: summary.avg_length,
            avg_weight: summary.avg_weight,
            max_length: summary.max_length,
            min_length: summary.min_length,
            max_weight: summary.max_weight,
            min_weight: summary.min_weight,
            sum_weight: summary.sum_weight,
            max_dwell_days: summary.max_dwell_days,
            min_dwell_days: summary.min_dwell_days,
            min_count_interval: extrema.min_count,
            max_count_interval: extrema.max_count,
            min_weight_interval: extrema.min_weight,
            max_weight_interval: extrema.max_weight,
        }
    }
}

impl Display for StatsReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Roll statistics:")?;
        writeln!(f, "  Rolls added: {}", self.added_count)?;
        writeln!(f, "  Rolls removed: {}", self.removed_count)?;
        writeln!(f, "  Average length: {:.3}", self.avg_length)?;
        writeln!(f, "  Average weight: {:.3}", self.avg_weight)?;
        writeln!(f, "  Max length: {}", self.max_length)?;
        writeln!(f, "  Min length: {}", self.min_length)?;
        writeln!(f, "  Max weight: {}", self.max_weight)?;
        writeln!(f, "  Min weight: {}", self.min_weight)?;
        writeln!(f, "  Total weight: {}", self.sum_weight)?;
        writeln!(f, "  Longest dwell (days): {}", display_days(self.max_dwell_days))?;
        writeln!(f, "  Shortest dwell (days): {}", display_days(self.min_dwell_days))?;
        writeln!(
            f,
            "  Fewest rolls in stock: from {} to {}, {} rolls",
            self.min_count_interval.from, self.min_count_interval.to, self.min_count_interval.value
        )?;
        writeln!(
            f,
            "  Most rolls in stock: from {} to {}, {} rolls",
            self.max_count_interval.from, self.max_count_interval.to, self.max_count_interval.value
        )?;
        writeln!(
            f,
            "  Lowest total weight: from {} to {}, {} kg",
            self.min_weight_interval.from,
            self.min_weight_interval.to,
            self.min_weight_interval.value
        )?;
        write!(
            f,
            "  Highest total weight: from {} to {}, {} kg",
            self.max_weight_interval.from,
            self.max_weight_interval.to,
            self.max_weight_interval.value
        )
    }
}

fn display_days(days: Option<i64>) -> String {
    days.map_or_else(|| "n/a".to_string(), |days| days.to_string())
}
