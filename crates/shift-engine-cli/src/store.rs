//! Persisted form state.
//!
//! The engine never sees storage. This module loads the six inputs and the
//! note map from named slots when the CLI starts and writes back only the
//! slots that changed. Any slot that is missing or unreadable falls back to
//! its default; a bad stored value is logged and otherwise ignored.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shift_engine::{NoteMap, ScheduleInputs};
use tracing::{debug, warn};

pub const SLOT_SLEEP_START: &str = "currentSleepStart";
pub const SLOT_SLEEP_END: &str = "currentSleepEnd";
pub const SLOT_CURRENT_DATE: &str = "currentDate";
pub const SLOT_START_DATE: &str = "startDate";
pub const SLOT_END_DATE: &str = "endDate";
pub const SLOT_DAILY_SHIFT: &str = "dailyShiftMinutes";
pub const SLOT_NOTES: &str = "scheduleNotes";

/// Load/save capability over named slots.
pub trait StateStore {
    fn load(&self, slot: &str) -> Option<Value>;
    fn save(&mut self, slot: &str, value: Value) -> Result<()>;
}

/// Slots held in memory only.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: BTreeMap<String, Value>,
}

#[cfg(test)]
impl StateStore for MemoryStore {
    fn load(&self, slot: &str) -> Option<Value> {
        self.slots.get(slot).cloned()
    }

    fn save(&mut self, slot: &str, value: Value) -> Result<()> {
        self.slots.insert(slot.to_string(), value);
        Ok(())
    }
}

/// Slots kept as one JSON object in a file, rewritten on every save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    slots: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; so is a
    /// file that does not hold a JSON object, which is overwritten on the
    /// next save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let slots = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(slots) => slots,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "state file is unreadable; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file yet");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading state file {}", path.display()))
            }
        };
        Ok(Self { path, slots })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, slot: &str) -> Option<Value> {
        self.slots.get(slot).cloned()
    }

    fn save(&mut self, slot: &str, value: Value) -> Result<()> {
        self.slots.insert(slot.to_string(), value);
        let text = serde_json::to_string_pretty(&self.slots)?;
        fs::write(&self.path, text)
            .with_context(|| format!("writing state file {}", self.path.display()))
    }
}

/// Everything the CLI remembers between runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub inputs: ScheduleInputs,
    pub notes: NoteMap,
}

impl AppState {
    /// Read every slot, substituting defaults for missing or unreadable ones.
    pub fn load(store: &dyn StateStore) -> Self {
        let defaults = ScheduleInputs::default();
        let inputs = ScheduleInputs {
            sleep_start: load_slot(store, SLOT_SLEEP_START, defaults.sleep_start),
            sleep_end: load_slot(store, SLOT_SLEEP_END, defaults.sleep_end),
            current_date: load_slot(store, SLOT_CURRENT_DATE, defaults.current_date),
            start_date: load_slot(store, SLOT_START_DATE, defaults.start_date),
            end_date: load_slot(store, SLOT_END_DATE, defaults.end_date),
            daily_shift_minutes: load_slot(store, SLOT_DAILY_SHIFT, defaults.daily_shift_minutes),
        };
        Self {
            inputs,
            notes: load_slot(store, SLOT_NOTES, NoteMap::new()),
        }
    }

    /// Write the slots whose value differs from `before`.
    pub fn save_changes(&self, before: &AppState, store: &mut dyn StateStore) -> Result<usize> {
        let (now, was) = (&self.inputs, &before.inputs);
        let mut written = 0;
        written += save_if_changed(store, SLOT_SLEEP_START, &now.sleep_start, &was.sleep_start)?;
        written += save_if_changed(store, SLOT_SLEEP_END, &now.sleep_end, &was.sleep_end)?;
        written +=
            save_if_changed(store, SLOT_CURRENT_DATE, &now.current_date, &was.current_date)?;
        written += save_if_changed(store, SLOT_START_DATE, &now.start_date, &was.start_date)?;
        written += save_if_changed(store, SLOT_END_DATE, &now.end_date, &was.end_date)?;
        written += save_if_changed(
            store,
            SLOT_DAILY_SHIFT,
            &now.daily_shift_minutes,
            &was.daily_shift_minutes,
        )?;
        written += save_if_changed(store, SLOT_NOTES, &self.notes, &before.notes)?;
        Ok(written)
    }
}

fn load_slot<T: DeserializeOwned>(store: &dyn StateStore, slot: &str, default: T) -> T {
    let Some(value) = store.load(slot) else {
        return default;
    };
    match serde_json::from_value(value) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(slot, error = %e, "stored value is unreadable; using default");
            default
        }
    }
}

fn save_if_changed<T: Serialize + PartialEq>(
    store: &mut dyn StateStore,
    slot: &str,
    now: &T,
    was: &T,
) -> Result<usize> {
    if now == was {
        return Ok(0);
    }
    let value = serde_json::to_value(now).with_context(|| format!("serializing {slot}"))?;
    store.save(slot, value)?;
    debug!(slot, "saved");
    Ok(1)
}
