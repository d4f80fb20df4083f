//! Drink log persistence.
//!
//! The log is a single JSON array rewritten wholesale on every mutation.
//! Entries keep insertion order, which is chronological order; the log is
//! never re-sorted.
//!
//! Reads never fail: a missing file is initialized to `[]`, and an unreadable
//! or non-array payload is treated as an empty log.

use crate::persist::{read_locked, write_json_atomic};
use crate::{DrinkEvent, NewDrink, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};

/// File-backed drink log
pub struct EventLogStore {
    path: PathBuf,
}

impl EventLogStore {
    /// Create a store for the given path. Nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full log
    pub fn load(&self) -> Vec<DrinkEvent> {
        let contents = match read_locked(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No drink log at {:?}, initializing empty log", self.path);
                if let Err(e) = write_json_atomic(&self.path, &Vec::<DrinkEvent>::new()) {
                    tracing::warn!("Unable to initialize drink log {:?}: {}", self.path, e);
                }
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to read drink log {:?}: {}. Using empty log.",
                    self.path,
                    e
                );
                return Vec::new();
            }
        };

        let entries = match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Array(entries)) => entries,
            Ok(other) => {
                tracing::warn!(
                    "Drink log {:?} is not a JSON array (found {}). Using empty log.",
                    self.path,
                    json_kind(&other)
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse drink log {:?}: {}. Using empty log.",
                    self.path,
                    e
                );
                return Vec::new();
            }
        };

        let mut events = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<DrinkEvent>(entry) {
                Ok(event) => events.push(event),
                Err(e) => {
                    tracing::warn!("Skipping malformed drink at index {}: {}", idx, e);
                }
            }
        }

        tracing::debug!("Loaded {} drinks from {:?}", events.len(), self.path);
        events
    }

    /// Stamp `drink` at `now`, append it and rewrite the log
    ///
    /// Returns the log as written; the new event is its last element.
    pub fn append(&self, drink: NewDrink, now: DateTime<Utc>) -> Result<Vec<DrinkEvent>> {
        drink.validate()?;

        let mut events = self.load();
        let event = drink.into_event(now);
        tracing::info!("Logging drink '{}' at {}", event.name, event.timestamp);
        events.push(event);

        write_json_atomic(&self.path, &events)?;
        Ok(events)
    }

    /// Replace the log with an empty one
    pub fn reset(&self) -> Result<()> {
        write_json_atomic(&self.path, &Vec::<DrinkEvent>::new())?;
        tracing::info!("Reset drink log {:?}", self.path);
        Ok(())
    }
}

/// Number of logged drinks with exactly this name
pub fn count_by_name(events: &[DrinkEvent], name: &str) -> usize {
    events.iter().filter(|e| e.name == name).count()
}

/// Per-name tallies in order of first appearance
pub fn counts(events: &[DrinkEvent]) -> Vec<(String, usize)> {
    let mut tallies: Vec<(String, usize)> = Vec::new();
    for event in events {
        match tallies.iter_mut().find(|(name, _)| *name == event.name) {
            Some((_, count)) => *count += 1,
            None => tallies.push((event.name.clone(), 1)),
        }
    }
    tallies
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
