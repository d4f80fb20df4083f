//! Persisted "last time it happened" record for the reminder page.
//!
//! The file holds one JSON object, `{"last_text_time": "<RFC 3339>"}`. When
//! it is missing or unreadable the record is reset to the current time and
//! written back, so callers always get a timestamp.

use crate::persist::{read_locked, write_json_atomic};
use crate::{ReminderState, Result};
use chrono::{DateTime, Duration, Utc};
use std::io;
use std::path::{Path, PathBuf};

/// File-backed single-event cache
pub struct ReminderCache {
    path: PathBuf,
}

impl ReminderCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored timestamp, or `now` (persisted) if there is none
    pub fn get_last_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        if let Some(state) = self.read() {
            return state.last_event_time;
        }

        let state = ReminderState {
            last_event_time: now,
        };
        if let Err(e) = write_json_atomic(&self.path, &state) {
            tracing::warn!("Unable to initialize reminder file {:?}: {}", self.path, e);
        }
        now
    }

    /// Mark the event as having happened at `now`
    pub fn record_now(&self, now: DateTime<Utc>) -> Result<()> {
        let state = ReminderState {
            last_event_time: now,
        };
        write_json_atomic(&self.path, &state)?;
        tracing::info!("Recorded reminder event at {}", now);
        Ok(())
    }

    /// Time since the stored event, never negative
    pub fn elapsed_since_last(&self, now: DateTime<Utc>) -> Duration {
        elapsed_between(self.get_last_time(now), now)
    }

    fn read(&self) -> Option<ReminderState> {
        let contents = match read_locked(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No reminder file at {:?}, starting from now", self.path);
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to read reminder file {:?}: {}. Resetting to now.",
                    self.path,
                    e
                );
                return None;
            }
        };

        match serde_json::from_str::<ReminderState>(&contents) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(
                    "Reminder file {:?} is corrupted: {}. Resetting to now.",
                    self.path,
                    e
                );
                None
            }
        }
    }
}

/// `now - last`, clamped at zero if the clock went backwards
pub fn elapsed_between(last: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let elapsed = now - last;
    if elapsed < Duration::zero() {
        tracing::warn!("Last event {} is after now {}; clock skew?", last, now);
        Duration::zero()
    } else {
        elapsed
    }
}
