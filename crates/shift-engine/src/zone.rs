//! Time conversion layer.
//!
//! Combines calendar dates with wall-clock times, moves instants between the
//! local and remote zones, and renders interval boundaries as clock-face
//! labels. Every function here is pure: zones are passed in explicitly and
//! nothing reads the system clock or the host's ambient timezone.
//!
//! # Functions
//!
//! - [`combine_date_and_time`] — `YYYY-MM-DD` date + `"HH:MM"` → instant in a zone
//! - [`convert_zone`] — the same instant re-expressed in another zone
//! - [`is_next_day`] — clock-face rollover test between two instants
//! - [`format_range`] — `("10:00 PM", "6:00 AM (next day)")` style labels

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike,
};
use chrono_tz::Tz;

use crate::error::{Result, ShiftError};

/// Suffix appended to an end label whose clock time does not come after its start.
pub const NEXT_DAY_SUFFIX: &str = " (next day)";

/// 12-hour clock face, no leading zero on the hour: "6:00 AM", "10:30 PM".
const CLOCK_FORMAT: &str = "%-I:%M %p";

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a 24-hour `"HH:MM"` time of day.
///
/// Out-of-range components are rejected rather than wrapped: `"24:00"` and
/// `"12:60"` are errors, not midnight and 13:00.
///
/// # Errors
///
/// Returns [`ShiftError::InvalidTime`] for anything that is not two numeric
/// components separated by `:` with hour 0-23 and minute 0-59.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    let (hour_part, minute_part) = trimmed
        .split_once(':')
        .ok_or_else(|| ShiftError::InvalidTime(format!("'{s}': expected HH:MM")))?;

    let hour = parse_clock_component(hour_part, s)?;
    let minute = parse_clock_component(minute_part, s)?;

    if hour > 23 {
        return Err(ShiftError::InvalidTime(format!(
            "'{s}': hour {hour} is outside 0-23"
        )));
    }
    if minute > 59 {
        return Err(ShiftError::InvalidTime(format!(
            "'{s}': minute {minute} is outside 0-59"
        )));
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| ShiftError::InvalidTime(format!("'{s}'")))
}

fn parse_clock_component(part: &str, original: &str) -> Result<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ShiftError::InvalidTime(format!(
            "'{original}': '{part}' is not a one- or two-digit number"
        )));
    }
    part.parse()
        .map_err(|_| ShiftError::InvalidTime(format!("'{original}'")))
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ShiftError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone name into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ShiftError::InvalidTimezone(format!("'{}'", s)))
}

// ── Wall clock → instant ────────────────────────────────────────────────────

/// Combine a calendar date with an `"HH:MM"` time of day in `zone`.
///
/// # Errors
///
/// Returns [`ShiftError::InvalidTime`] if `time_of_day` is malformed.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use shift_engine::zone::combine_date_and_time;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let at = combine_date_and_time(date, "22:00", chrono_tz::America::Vancouver).unwrap();
/// assert_eq!(at.to_rfc3339(), "2024-01-15T22:00:00-08:00");
/// ```
pub fn combine_date_and_time(
    date: NaiveDate,
    time_of_day: &str,
    zone: Tz,
) -> Result<DateTime<Tz>> {
    let time = parse_time_of_day(time_of_day)?;
    Ok(at_wall_clock(zone, date.and_time(time)))
}

/// Resolve a wall-clock reading in `zone` to a single instant.
///
/// Daylight-saving edges never fail:
/// - a reading inside a spring-forward gap is interpreted with the offset in
///   effect before the gap, landing just past it (02:30 → 03:30);
/// - a reading inside a fall-back overlap resolves to the earlier instant.
pub fn at_wall_clock(zone: Tz, wall: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&wall) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before_gap = zone.offset_from_utc_datetime(&(wall - Duration::days(1)));
            let utc = wall - Duration::seconds(i64::from(before_gap.fix().local_minus_utc()));
            zone.from_utc_datetime(&utc)
        }
    }
}

// ── Zone conversion ─────────────────────────────────────────────────────────

/// Re-express an instant as wall-clock time in `to`.
///
/// The offset applied is the one `to` observes at that instant, so dates on
/// either side of a daylight-saving transition get different offsets.
pub fn convert_zone<T: TimeZone>(instant: &DateTime<T>, to: Tz) -> DateTime<Tz> {
    instant.with_timezone(&to)
}

/// Interpret `wall` as a reading in `from` and re-express it in `to`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chrono_tz::{America::Vancouver, Asia::Shanghai};
/// use shift_engine::zone::convert_wall_clock;
///
/// let wall = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(22, 0, 0).unwrap();
/// let remote = convert_wall_clock(wall, Vancouver, Shanghai);
/// assert_eq!(remote.to_rfc3339(), "2024-01-16T14:00:00+08:00");
/// ```
pub fn convert_wall_clock(wall: NaiveDateTime, from: Tz, to: Tz) -> DateTime<Tz> {
    convert_zone(&at_wall_clock(from, wall), to)
}

// ── Rollover and formatting ─────────────────────────────────────────────────

/// Whether `end` appears on the following day relative to `start`, judged by
/// clock face in `zone`.
///
/// Only hours and minutes are compared, never calendar dates. An end time
/// equal to the start time counts as the next day: an interval is never
/// zero-length.
pub fn is_next_day<T: TimeZone>(start: &DateTime<T>, end: &DateTime<T>, zone: Tz) -> bool {
    let start = start.with_timezone(&zone);
    let end = end.with_timezone(&zone);
    (end.hour(), end.minute()) <= (start.hour(), start.minute())
}

/// Render one instant on the 12-hour clock face of `zone`.
pub fn format_clock<T: TimeZone>(instant: &DateTime<T>, zone: Tz) -> String {
    instant.with_timezone(&zone).format(CLOCK_FORMAT).to_string()
}

/// Render both ends of an interval in `zone`, marking the end label with
/// [`NEXT_DAY_SUFFIX`] when it rolls over.
///
/// The same primitive serves the local and the remote column; "local" is
/// just the zone the inputs were entered in.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chrono_tz::America::Vancouver;
/// use shift_engine::zone::{combine_date_and_time, format_range};
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let start = combine_date_and_time(date, "22:00", Vancouver).unwrap();
/// let end = combine_date_and_time(date.succ_opt().unwrap(), "06:00", Vancouver).unwrap();
/// let (from, to) = format_range(&start, &end, Vancouver);
/// assert_eq!(from, "10:00 PM");
/// assert_eq!(to, "6:00 AM (next day)");
/// ```
pub fn format_range<T: TimeZone>(
    start: &DateTime<T>,
    end: &DateTime<T>,
    zone: Tz,
) -> (String, String) {
    let start_label = format_clock(start, zone);
    let mut end_label = format_clock(end, zone);
    if is_next_day(start, end, zone) {
        end_label.push_str(NEXT_DAY_SUFFIX);
    }
    (start_label, end_label)
}

// ── Tests ───────────────────────────────────────────────────────────────────
