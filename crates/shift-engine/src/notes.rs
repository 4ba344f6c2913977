//! Date-keyed notes.
//!
//! Notes live in a plain map from `YYYY-MM-DD` to free text, one note per
//! date. Keys are not tied to any particular schedule: a note outside the
//! current range is kept and shows up again once the range covers its date.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::zone::parse_date;

/// Notes keyed by `YYYY-MM-DD`.
pub type NoteMap = BTreeMap<String, String>;

/// Which way [`shift_notes_by_one_day`] moves every note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    /// Each note moves to the previous day.
    Up,
    /// Each note moves to the following day.
    Down,
}

impl ShiftDirection {
    /// `-1` for [`Up`](Self::Up), `+1` for [`Down`](Self::Down).
    pub fn days(self) -> i64 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }

    /// Map a `±1` day offset onto a direction; anything else is `None`.
    pub fn from_days(days: i64) -> Option<Self> {
        match days {
            -1 => Some(Self::Up),
            1 => Some(Self::Down),
            _ => None,
        }
    }
}

/// The key a note for `date` is stored under.
pub fn note_key_for(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Look up the note for `date`.
pub fn note_for(notes: &NoteMap, date: NaiveDate) -> Option<&str> {
    notes.get(&note_key_for(date)).map(String::as_str)
}

/// Store `text` as the note for `date`, replacing any previous note.
/// Blank text removes the note instead.
pub fn set_note(notes: &mut NoteMap, date: NaiveDate, text: &str) {
    let key = note_key_for(date);
    if text.trim().is_empty() {
        notes.remove(&key);
    } else {
        notes.insert(key, text.to_string());
    }
}

/// Re-key every note one calendar day earlier ([`ShiftDirection::Up`]) or
/// later ([`ShiftDirection::Down`]).
///
/// The result is built from `notes` into a fresh map, so no note is moved
/// twice and none are dropped. Keys that are not canonical `YYYY-MM-DD`
/// dates (free text, or dates missing zero padding) are carried over
/// unchanged; shifted keys are always canonical, so the two never collide.
///
/// # Examples
///
/// ```
/// use shift_engine::notes::{shift_notes_by_one_day, NoteMap, ShiftDirection};
///
/// let notes = NoteMap::from([
///     ("2024-01-20".to_string(), "A".to_string()),
///     ("2024-01-21".to_string(), "B".to_string()),
/// ]);
/// let up = shift_notes_by_one_day(&notes, ShiftDirection::Up);
/// assert_eq!(up.get("2024-01-19").map(String::as_str), Some("A"));
/// assert_eq!(up.get("2024-01-20").map(String::as_str), Some("B"));
/// ```
pub fn shift_notes_by_one_day(notes: &NoteMap, direction: ShiftDirection) -> NoteMap {
    notes
        .iter()
        .map(|(key, text)| (shift_key(key, direction), text.clone()))
        .collect()
}

fn shift_key(key: &str, direction: ShiftDirection) -> String {
    let date = match parse_date(key) {
        Ok(date) if note_key_for(date) == key => date,
        _ => {
            warn!(key, "note key is not a canonical date; leaving it in place");
            return key.to_string();
        }
    };
    let shifted = match direction {
        ShiftDirection::Up => date.checked_sub_days(Days::new(1)),
        ShiftDirection::Down => date.checked_add_days(Days::new(1)),
    };
    match shifted {
        Some(shifted) => note_key_for(shifted),
        None => {
            warn!(key, "note date cannot move further; leaving it in place");
            key.to_string()
        }
    }
}
