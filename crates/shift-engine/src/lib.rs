//! # shift-engine
//!
//! Deterministic sleep-schedule shifting.
//!
//! Given a current sleep window, a daily shift in minutes, and a date range,
//! the engine lays out every day's shifted sleep and wake intervals and renders
//! them on the clock face of two zones at once: the zone the inputs were
//! entered in and a fixed remote zone. Day rollover is judged separately in
//! each zone.
//!
//! ## Modules
//!
//! - [`zone`] — Date + time combination, zone conversion, rollover test, range formatting
//! - [`schedule`] — Cumulative per-day shift → list of [`ScheduleRow`]
//! - [`notes`] — Date-keyed notes and the uniform ±1 day re-key
//! - [`calendar`] — Schedule rows → timed calendar events
//! - [`config`] — Raw form inputs, validated requests, zone pair
//! - [`error`] — Error types

pub mod calendar;
pub mod config;
pub mod error;
pub mod notes;
pub mod schedule;
pub mod zone;

pub use calendar::{calendar_events, CalendarEvent};
pub use config::{ScheduleInputs, ScheduleRequest, Zones, LOCAL_TZ, REMOTE_TZ};
pub use error::ShiftError;
pub use notes::{note_key_for, shift_notes_by_one_day, NoteMap, ShiftDirection};
pub use schedule::{generate, generate_schedule, Interval, ScheduleRow};
pub use zone::{combine_date_and_time, convert_zone, format_range, is_next_day};
