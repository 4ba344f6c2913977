//! Calendar-view adapter.
//!
//! Turns schedule rows into timed events for a day/week/month calendar. The
//! events are built from the instants each row carries, never from its
//! display labels.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::schedule::ScheduleRow;

pub const SLEEP_SUBJECT: &str = "Sleep";
pub const AWAKE_SUBJECT: &str = "Awake";

/// A timed calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// 1-based, sequential in row order.
    pub id: u32,
    pub subject: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub is_all_day: bool,
}

/// One "Sleep" event per row, and an "Awake" event filling each gap between
/// one row's sleep end and the next row's sleep start.
///
/// Gaps that are empty or negative (a shift so large that consecutive sleeps
/// overlap) produce no "Awake" event. Events are sorted by start before ids
/// are assigned, so a large backward shift still yields them in time order.
pub fn calendar_events(rows: &[ScheduleRow]) -> Vec<CalendarEvent> {
    let mut spans = Vec::with_capacity(rows.len() * 2);
    for (i, row) in rows.iter().enumerate() {
        spans.push((SLEEP_SUBJECT, row.sleep.start, row.sleep.end));
        let has_next = i + 1 < rows.len();
        if has_next && row.wake.end > row.wake.start {
            spans.push((AWAKE_SUBJECT, row.wake.start, row.wake.end));
        }
    }
    spans.sort_by_key(|&(_, start, _)| start);

    spans
        .into_iter()
        .zip(1u32..)
        .map(|((subject, start, end), id)| CalendarEvent {
            id,
            subject: subject.to_string(),
            start,
            end,
            is_all_day: false,
        })
        .collect()
}
