//! Schedule generation.
//!
//! Produces one [`ScheduleRow`] per calendar day of the requested range. The
//! sleep window moves by `daily_shift_minutes` for every day elapsed since the
//! reference date, so a range that starts after the reference date already
//! carries the shift that built up in between.
//!
//! # Example
//!
//! ```
//! use shift_engine::generate_schedule;
//!
//! let rows = generate_schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-16", 30.0)
//!     .unwrap();
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].sleep_start, "10:00 PM");
//! assert_eq!(rows[0].sleep_end, "6:00 AM (next day)");
//! assert_eq!(rows[1].sleep_start, "10:30 PM");
//! ```

use chrono::{DateTime, Days, Duration, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::config::{ScheduleRequest, Zones};
use crate::error::{Result, ShiftError};
use crate::zone::{at_wall_clock, convert_zone, format_range};

/// A span between two instants, kept in the zone the schedule was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Interval {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The same interval with both ends re-expressed in `zone`.
    pub fn in_zone(&self, zone: Tz) -> Self {
        Self {
            start: convert_zone(&self.start, zone),
            end: convert_zone(&self.end, zone),
        }
    }
}

/// One day of the plan.
///
/// Labels are 12-hour clock strings; end labels carry `" (next day)"` when
/// they roll over in the zone they are rendered in. Wake is the complement of
/// sleep: it starts when sleep ends and ends when sleep starts again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    /// 1-based position within the range.
    pub day: u32,
    /// Local calendar date of this row.
    pub date: NaiveDate,
    pub sleep_start: String,
    pub sleep_end: String,
    pub wake_start: String,
    pub wake_end: String,
    pub sleep_start_remote: String,
    pub sleep_end_remote: String,
    pub wake_start_remote: String,
    pub wake_end_remote: String,
    /// The shifted sleep window as instants; `end` always falls after `start`.
    pub sleep: Interval,
    /// From this row's sleep end to the next day's shifted sleep start, so it
    /// carries one more day of shift than `sleep`.
    pub wake: Interval,
}

/// Generate the schedule from raw form values, rendered in the default zones.
///
/// # Errors
///
/// Returns a [`ShiftError`] if a time or date is malformed, the shift is not
/// finite, or the cumulative shift runs off the representable calendar.
pub fn generate_schedule(
    sleep_start: &str,
    sleep_end: &str,
    reference_date: &str,
    range_start: &str,
    range_end: &str,
    daily_shift_minutes: f64,
) -> Result<Vec<ScheduleRow>> {
    let request = ScheduleRequest::parse(
        sleep_start,
        sleep_end,
        reference_date,
        range_start,
        range_end,
        daily_shift_minutes,
    )?;
    generate(&request, &Zones::default())
}

/// Generate the schedule for a validated request.
///
/// An inverted range (end before start) yields an empty schedule.
///
/// # Errors
///
/// Returns [`ShiftError::InvalidShift`] if the cumulative shift moves an
/// instant outside the range chrono can represent.
pub fn generate(request: &ScheduleRequest, zones: &Zones) -> Result<Vec<ScheduleRow>> {
    let total_days = request.total_days();
    let offset_days = request.offset_days();

    debug!(
        total_days,
        offset_days,
        daily_shift_minutes = request.daily_shift_minutes,
        local = %zones.local,
        remote = %zones.remote,
        "generating schedule"
    );

    let mut rows = Vec::with_capacity(total_days);
    for i in 0..total_days {
        let day = (i + 1) as u32;
        let date = request.range_start + Days::new(i as u64);
        let elapsed = offset_days + i as i64;
        let shift_minutes = elapsed as f64 * request.daily_shift_minutes;

        let sleep_start = shifted(
            at_wall_clock(zones.local, date.and_time(request.sleep_start)),
            shift_minutes,
        )?;
        let sleep_end = shifted(
            at_wall_clock(zones.local, date.and_time(request.sleep_end)),
            shift_minutes,
        )?;
        let (wake_start, wake_end) = (sleep_end, sleep_start);

        let (sleep_start_label, sleep_end_label) =
            format_range(&sleep_start, &sleep_end, zones.local);
        let (wake_start_label, wake_end_label) = format_range(&wake_start, &wake_end, zones.local);

        let (sleep_start_remote, sleep_end_remote) = format_range(
            &convert_zone(&sleep_start, zones.remote),
            &convert_zone(&sleep_end, zones.remote),
            zones.remote,
        );
        let (wake_start_remote, wake_end_remote) = format_range(
            &convert_zone(&wake_start, zones.remote),
            &convert_zone(&wake_end, zones.remote),
            zones.remote,
        );

        let sleep = overnight_window(
            request,
            zones.local,
            date,
            sleep_start,
            sleep_end,
            shift_minutes,
        )?;
        let next_date = date
            .succ_opt()
            .ok_or_else(|| ShiftError::InvalidDate(format!("no day after {date}")))?;
        let next_sleep_start = shifted(
            at_wall_clock(zones.local, next_date.and_time(request.sleep_start)),
            (elapsed + 1) as f64 * request.daily_shift_minutes,
        )?;

        rows.push(ScheduleRow {
            day,
            date,
            sleep_start: sleep_start_label,
            sleep_end: sleep_end_label,
            wake_start: wake_start_label,
            wake_end: wake_end_label,
            sleep_start_remote,
            sleep_end_remote,
            wake_start_remote,
            wake_end_remote,
            sleep,
            wake: Interval::new(sleep.end, next_sleep_start),
        });
    }

    Ok(rows)
}

/// Both ends are built on the row's own date; when the end does not come
/// after the start, the window actually closes on the following morning.
fn overnight_window(
    request: &ScheduleRequest,
    zone: Tz,
    date: NaiveDate,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    shift_minutes: f64,
) -> Result<Interval> {
    if end > start {
        return Ok(Interval::new(start, end));
    }
    let next = date
        .succ_opt()
        .ok_or_else(|| ShiftError::InvalidDate(format!("no day after {date}")))?;
    let end = shifted(
        at_wall_clock(zone, next.and_time(request.sleep_end)),
        shift_minutes,
    )?;
    Ok(Interval::new(start, end))
}

/// Move `base` by a possibly fractional number of minutes, kept to the
/// millisecond.
fn shifted(base: DateTime<Tz>, minutes: f64) -> Result<DateTime<Tz>> {
    let millis = (minutes * 60_000.0).round() as i64;
    Duration::try_milliseconds(millis)
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or_else(|| {
            ShiftError::InvalidShift(format!(
                "shifting by {minutes} minutes leaves the supported calendar range"
            ))
        })
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleInputs;
    use proptest::prelude::*;

    fn schedule(
        start: &str,
        end: &str,
        reference: &str,
        from: &str,
        to: &str,
        shift: f64,
    ) -> Vec<ScheduleRow> {
        generate_schedule(start, end, reference, from, to, shift).unwrap()
    }

    // ── local labels ────────────────────────────────────────────────────

    #[test]
    fn test_first_row_is_unshifted_on_reference_date() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-16", 30.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].day, 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(rows[0].sleep_start, "10:00 PM");
        assert_eq!(rows[0].sleep_end, "6:00 AM (next day)");
    }

    #[test]
    fn test_second_row_shifts_by_daily_minutes() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-16", 30.0);
        assert_eq!(rows[1].day, 2);
        assert_eq!(rows[1].sleep_start, "10:30 PM");
        assert_eq!(rows[1].sleep_end, "6:30 AM (next day)");
    }

    #[test]
    fn test_wake_is_inverse_of_sleep() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-15", 30.0);
        assert_eq!(rows[0].wake_start, "6:00 AM");
        assert_eq!(rows[0].wake_end, "10:00 PM");
    }

    #[test]
    fn test_zero_shift_repeats_every_day() {
        let rows = schedule("21:54", "06:22", "2024-02-20", "2024-02-25", "2024-03-05", 0.0);
        assert_eq!(rows.len(), 10);
        for row in &rows {
            assert_eq!(row.sleep_start, rows[0].sleep_start);
            assert_eq!(row.sleep_end, rows[0].sleep_end);
            assert_eq!(row.wake_start, rows[0].wake_start);
            assert_eq!(row.wake_end, rows[0].wake_end);
        }
        assert_eq!(rows[0].sleep_start, "9:54 PM");
        assert_eq!(rows[0].sleep_end, "6:22 AM (next day)");
    }

    #[test]
    fn test_range_after_reference_carries_accumulated_shift() {
        // Five days elapsed at 30 min/day: 22:00 + 2h30 crosses midnight
        let rows = schedule("22:00", "06:00", "2024-01-10", "2024-01-15", "2024-01-15", 30.0);
        assert_eq!(rows[0].day, 1);
        assert_eq!(rows[0].sleep_start, "12:30 AM");
        assert_eq!(rows[0].sleep_end, "8:30 AM");
    }

    #[test]
    fn test_range_before_reference_shifts_backwards() {
        let rows = schedule("22:00", "06:00", "2024-01-17", "2024-01-15", "2024-01-15", 30.0);
        assert_eq!(rows[0].sleep_start, "9:00 PM");
        assert_eq!(rows[0].sleep_end, "5:00 AM (next day)");
    }

    #[test]
    fn test_negative_daily_shift_moves_earlier() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-17", -45.0);
        assert_eq!(rows[1].sleep_start, "9:15 PM");
        assert_eq!(rows[2].sleep_start, "8:30 PM");
    }

    #[test]
    fn test_fractional_shift_is_not_rounded_per_day() {
        // 7 × 51.43 = 360.01 minutes: exactly 04:00, where per-day rounding
        // to 51 minutes would give 03:57.
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-22", 51.43);
        assert_eq!(rows[1].sleep_start, "10:51 PM");
        assert_eq!(rows[7].sleep_start, "4:00 AM");
        assert_eq!(rows[7].sleep_end, "12:00 PM");
    }

    // ── remote labels ───────────────────────────────────────────────────

    #[test]
    fn test_remote_labels_use_remote_clock_face() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-15", 0.0);
        let row = &rows[0];
        // PST is UTC-8, Shanghai UTC+8
        assert_eq!(row.sleep_start_remote, "2:00 PM");
        assert_eq!(row.sleep_end_remote, "10:00 PM");
        assert_eq!(row.wake_start_remote, "10:00 PM");
        assert_eq!(row.wake_end_remote, "2:00 PM (next day)");
    }

    #[test]
    fn test_remote_labels_follow_dst_transition() {
        // Vancouver springs forward on March 10, 2024; Shanghai does not
        let rows = schedule("22:00", "06:00", "2024-03-09", "2024-03-09", "2024-03-10", 0.0);
        assert_eq!(rows[0].sleep_start, "10:00 PM");
        assert_eq!(rows[1].sleep_start, "10:00 PM");
        assert_eq!(rows[0].sleep_start_remote, "2:00 PM");
        assert_eq!(rows[1].sleep_start_remote, "1:00 PM");
    }

    #[test]
    fn test_custom_zone_pair() {
        let request =
            ScheduleRequest::parse("23:00", "07:00", "2024-06-01", "2024-06-01", "2024-06-01", 0.0)
                .unwrap();
        let zones = Zones::new("Europe/London", "Asia/Tokyo").unwrap();
        let rows = generate(&request, &zones).unwrap();
        // BST (UTC+1) → JST (UTC+9)
        assert_eq!(rows[0].sleep_start, "11:00 PM");
        assert_eq!(rows[0].sleep_start_remote, "7:00 AM");
        assert_eq!(rows[0].sleep_end_remote, "3:00 PM");
    }

    // ── instants ────────────────────────────────────────────────────────

    #[test]
    fn test_sleep_interval_ends_after_it_starts() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-16", 30.0);
        for row in &rows {
            assert!(row.sleep.end > row.sleep.start);
            assert_eq!(row.sleep.duration(), Duration::hours(8));
        }
        assert_eq!(rows[1].sleep.start.to_rfc3339(), "2024-01-16T22:30:00-08:00");
        assert_eq!(rows[1].sleep.end.to_rfc3339(), "2024-01-17T06:30:00-08:00");
    }

    #[test]
    fn test_daytime_sleep_window_stays_on_same_date() {
        let rows = schedule("10:00", "18:00", "2024-01-15", "2024-01-15", "2024-01-15", 0.0);
        assert_eq!(rows[0].sleep_end, "6:00 PM");
        assert_eq!(rows[0].sleep.end.to_rfc3339(), "2024-01-15T18:00:00-08:00");
        assert_eq!(rows[0].wake.duration(), Duration::hours(16));
    }

    #[test]
    fn test_wake_interval_ends_at_next_shifted_sleep() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-17", 30.0);
        for pair in rows.windows(2) {
            assert_eq!(pair[0].wake.start, pair[0].sleep.end);
            assert_eq!(pair[0].wake.end, pair[1].sleep.start);
        }
        // 06:00 → 22:30 the same day
        assert_eq!(rows[0].wake.duration(), Duration::minutes(16 * 60 + 30));
        assert_eq!(rows[2].wake.end.to_rfc3339(), "2024-01-18T23:30:00-08:00");
    }

    #[test]
    fn test_wake_interval_with_fractional_shift_meets_next_row() {
        let rows = schedule("21:54", "06:22", "2025-07-07", "2025-10-20", "2025-10-23", 51.43);
        for pair in rows.windows(2) {
            assert_eq!(pair[0].wake.end, pair[1].sleep.start);
        }
    }

    #[test]
    fn test_interval_in_remote_zone() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-15", 0.0);
        let remote = rows[0].sleep.in_zone(chrono_tz::Asia::Shanghai);
        assert_eq!(remote.start.to_rfc3339(), "2024-01-16T14:00:00+08:00");
        assert_eq!(remote.end.to_rfc3339(), "2024-01-16T22:00:00+08:00");
    }

    // ── edge cases ──────────────────────────────────────────────────────

    #[test]
    fn test_inverted_range_is_empty() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-20", "2024-01-19", 30.0);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        let bad_time =
            generate_schedule("22:00", "6", "2024-01-15", "2024-01-15", "2024-01-16", 0.0);
        assert!(matches!(bad_time, Err(ShiftError::InvalidTime(_))));
        let bad_date =
            generate_schedule("22:00", "06:00", "yesterday", "2024-01-15", "2024-01-16", 0.0);
        assert!(matches!(bad_date, Err(ShiftError::InvalidDate(_))));
    }

    #[test]
    fn test_overflowing_shift_is_an_error() {
        let result =
            generate_schedule("22:00", "06:00", "2024-01-15", "2024-01-16", "2024-01-16", 1e300);
        assert!(matches!(result, Err(ShiftError::InvalidShift(_))));
    }

    #[test]
    fn test_default_inputs_generate_full_range() {
        let request = ScheduleInputs::default().parse().unwrap();
        let rows = generate(&request, &Zones::default()).unwrap();
        assert_eq!(rows.len(), 26);
        let last = rows.last().unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2025, 11, 14).unwrap());
    }

    #[test]
    fn test_row_serializes_with_camel_case_keys() {
        let rows = schedule("22:00", "06:00", "2024-01-15", "2024-01-15", "2024-01-15", 0.0);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["day"], 1);
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["sleepEnd"], "6:00 AM (next day)");
        assert_eq!(json["wakeEndRemote"], "2:00 PM (next day)");
        assert!(json["sleep"]["start"].as_str().unwrap().starts_with("2024-01-15T22:00:00"));
        assert!(json["wake"]["end"].as_str().unwrap().starts_with("2024-01-16T22:00:00"));
    }

    proptest! {
        #[test]
        fn prop_rows_cover_range_contiguously(
            start_offset in -60i64..60,
            len in 0i64..90,
            shift in -120.0f64..120.0,
        ) {
            let reference = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            let from = reference + Duration::days(start_offset);
            let to = from + Duration::days(len);
            let request = ScheduleRequest {
                sleep_start: chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                sleep_end: chrono::NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                reference_date: reference,
                range_start: from,
                range_end: to,
                daily_shift_minutes: shift,
            };
            let rows = generate(&request, &Zones::default()).unwrap();
            prop_assert_eq!(rows.len() as i64, len + 1);
            for (i, row) in rows.iter().enumerate() {
                prop_assert_eq!(row.day as usize, i + 1);
                prop_assert_eq!(row.date, from + Duration::days(i as i64));
            }
            for pair in rows.windows(2) {
                prop_assert_eq!(pair[0].wake.end, pair[1].sleep.start);
            }
        }
    }
}
