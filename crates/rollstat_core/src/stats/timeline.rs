//! Add/remove event timeline for a query window.
//!
//! # Invariants
//! - Output is sorted by date ascending.
//! - On the same date, every `Add` precedes every `Remove`; events of the
//!   same date and kind keep input order.
//! - No event is dated after the window end.

use crate::model::roll::Roll;
use crate::model::window::DateWindow;
use chrono::NaiveDate;

/// Direction of a stock boundary crossing.
///
/// Variant order is the same-date tie-break: adds sort before removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Add,
    Remove,
}

/// One boundary crossing of a roll's stock-presence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub weight: f64,
}

/// Builds the chronological event sequence for `rolls` as seen from `window`.
///
/// `rolls` is expected to be the overlapping set for `window`. Adds before the
/// window start are kept so the running totals enter the window correctly.
pub fn build_timeline(rolls: &[Roll], window: &DateWindow) -> Vec<TimelineEvent> {
    let mut events = Vec::with_capacity(rolls.len() * 2);

    for roll in rolls {
        if roll.date_added <= window.end() {
            events.push(TimelineEvent {
                date: roll.date_added,
                kind: EventKind::Add,
                weight: roll.weight,
            });
        }
        if let Some(removed) = roll.date_removed.filter(|removed| *removed <= window.end()) {
            events.push(TimelineEvent {
                date: removed,
                kind: EventKind::Remove,
                weight: roll.weight,
            });
        }
    }

    events.sort_by_key(|event| (event.date, event.kind));
    events
}

#[cfg(test)]
mod tests {
    use super::{build_timeline, EventKind};
    use crate::model::roll::Roll;
    use crate::model::window::DateWindow;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn roll(id: i64, weight: f64, added: NaiveDate, removed: Option<NaiveDate>) -> Roll {
        Roll {
            id,
            length: 1.0,
            weight,
            date_added: added,
            date_removed: removed,
        }
    }

    #[test]
    fn events_are_chronological() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let rolls = vec![
            roll(1, 10.0, date(2024, 3, 1), Some(date(2024, 5, 1))),
            roll(2, 20.0, date(2024, 1, 1), None),
            roll(3, 30.0, date(2024, 2, 1), Some(date(2024, 4, 1))),
        ];

        let dates: Vec<_> = build_timeline(&rolls, &window)
            .iter()
            .map(|event| event.date)
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 2, 1),
                date(2024, 3, 1),
                date(2024, 4, 1),
                date(2024, 5, 1),
            ]
        );
    }

    #[test]
    fn removals_after_window_end_are_dropped() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let rolls = vec![roll(1, 5.0, date(2023, 12, 1), Some(date(2024, 2, 15)))];

        let events = build_timeline(&rolls, &window);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Add);
        assert_eq!(events[0].date, date(2023, 12, 1));
    }

    #[test]
    fn same_day_add_precedes_remove() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let rolls = vec![
            roll(1, 5.0, date(2024, 1, 1), Some(date(2024, 6, 1))),
            roll(2, 7.0, date(2024, 6, 1), None),
        ];

        let events = build_timeline(&rolls, &window);
        assert_eq!(events[1].date, date(2024, 6, 1));
        assert_eq!(events[1].kind, EventKind::Add);
        assert_eq!(events[1].weight, 7.0);
        assert_eq!(events[2].kind, EventKind::Remove);
    }
}
