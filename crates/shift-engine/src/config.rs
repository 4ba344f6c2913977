//! Schedule inputs and zone configuration.
//!
//! The six scalar inputs arrive as primitives ([`ScheduleInputs`]) and are
//! validated once into a typed [`ScheduleRequest`]. Loading and saving the
//! inputs is the caller's business; this module only describes them.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftError};
use crate::zone::{parse_date, parse_time_of_day, parse_timezone};

/// Zone the sleep/wake inputs are entered in.
pub const LOCAL_TZ: Tz = chrono_tz::America::Vancouver;

/// Fixed zone the schedule is also rendered in.
pub const REMOTE_TZ: Tz = chrono_tz::Asia::Shanghai;

pub const DEFAULT_SLEEP_START: &str = "21:54";
pub const DEFAULT_SLEEP_END: &str = "06:22";
pub const DEFAULT_CURRENT_DATE: &str = "2025-07-07";
pub const DEFAULT_START_DATE: &str = "2025-10-20";
pub const DEFAULT_END_DATE: &str = "2025-11-14";
pub const DEFAULT_DAILY_SHIFT_MINUTES: f64 = 51.43;

/// The local/remote zone pair a schedule is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zones {
    pub local: Tz,
    pub remote: Tz,
}

impl Default for Zones {
    fn default() -> Self {
        Self {
            local: LOCAL_TZ,
            remote: REMOTE_TZ,
        }
    }
}

impl Zones {
    /// Build a zone pair from IANA names.
    ///
    /// # Errors
    ///
    /// Returns [`ShiftError::InvalidTimezone`] if either name is unknown.
    pub fn new(local: &str, remote: &str) -> Result<Self> {
        Ok(Self {
            local: parse_timezone(local)?,
            remote: parse_timezone(remote)?,
        })
    }
}

/// The six form inputs, exactly as a user typed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInputs {
    /// Current sleep start, `"HH:MM"`.
    pub sleep_start: String,
    /// Current sleep end, `"HH:MM"`.
    pub sleep_end: String,
    /// The date the current (unshifted) schedule applies to, `YYYY-MM-DD`.
    pub current_date: String,
    /// First day of the rendered range, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day of the rendered range (inclusive), `YYYY-MM-DD`.
    pub end_date: String,
    /// Minutes the sleep window moves each day; negative moves it earlier.
    pub daily_shift_minutes: f64,
}

impl Default for ScheduleInputs {
    fn default() -> Self {
        Self {
            sleep_start: DEFAULT_SLEEP_START.to_string(),
            sleep_end: DEFAULT_SLEEP_END.to_string(),
            current_date: DEFAULT_CURRENT_DATE.to_string(),
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: DEFAULT_END_DATE.to_string(),
            daily_shift_minutes: DEFAULT_DAILY_SHIFT_MINUTES,
        }
    }
}

impl ScheduleInputs {
    /// Validate every field into a [`ScheduleRequest`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ShiftError`] encountered: a malformed time, a
    /// malformed date, or a non-finite shift.
    pub fn parse(&self) -> Result<ScheduleRequest> {
        ScheduleRequest::parse(
            &self.sleep_start,
            &self.sleep_end,
            &self.current_date,
            &self.start_date,
            &self.end_date,
            self.daily_shift_minutes,
        )
    }
}

/// Validated schedule inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleRequest {
    pub sleep_start: NaiveTime,
    pub sleep_end: NaiveTime,
    /// Anchor the cumulative shift is measured from.
    pub reference_date: NaiveDate,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub daily_shift_minutes: f64,
}

impl ScheduleRequest {
    pub fn parse(
        sleep_start: &str,
        sleep_end: &str,
        reference_date: &str,
        range_start: &str,
        range_end: &str,
        daily_shift_minutes: f64,
    ) -> Result<Self> {
        if !daily_shift_minutes.is_finite() {
            return Err(ShiftError::InvalidShift(format!(
                "{daily_shift_minutes} is not a finite number of minutes"
            )));
        }
        Ok(Self {
            sleep_start: parse_time_of_day(sleep_start)?,
            sleep_end: parse_time_of_day(sleep_end)?,
            reference_date: parse_date(reference_date)?,
            range_start: parse_date(range_start)?,
            range_end: parse_date(range_end)?,
            daily_shift_minutes,
        })
    }

    /// Number of rows the range produces; zero when the range is inverted.
    pub fn total_days(&self) -> usize {
        let days = (self.range_end - self.range_start).num_days() + 1;
        usize::try_from(days).unwrap_or(0)
    }

    /// Days of shift already accumulated by the first day of the range.
    /// Negative when the range starts before the reference date.
    pub fn offset_days(&self) -> i64 {
        (self.range_start - self.reference_date).num_days()
    }
}
