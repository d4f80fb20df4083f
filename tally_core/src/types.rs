//! Core domain types for Tally.
//!
//! This module defines the fundamental types used throughout the system:
//! - Drink events as persisted in the drink log
//! - The singleton reminder state
//! - Status tiers derived from the current metric
//! - The subject profile feeding the decay estimator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Drink Log Types
// ============================================================================

/// A recorded drink, one entry of the drink log.
///
/// The serde layout is the on-disk format:
/// `{"timestamp": <float>, "name": <string>, "volume_ml": <number>, "abv": <number>}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrinkEvent {
    /// Unix seconds, fractional
    pub timestamp: f64,
    pub name: String,
    pub volume_ml: f64,
    /// Fraction in 0..=1
    pub abv: f64,
}

impl DrinkEvent {
    /// Grams of pure alcohol (ethanol density 0.8 g/ml)
    pub fn grams_alcohol(&self) -> f64 {
        self.volume_ml * self.abv * 0.8
    }

    /// Timestamp as a UTC datetime, if representable
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        from_unix_seconds(self.timestamp)
    }
}

/// Fields supplied by the caller when logging a drink. The store stamps the time.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDrink {
    pub name: String,
    pub volume_ml: f64,
    pub abv: f64,
}

impl NewDrink {
    pub fn new(name: impl Into<String>, volume_ml: f64, abv: f64) -> Self {
        Self {
            name: name.into(),
            volume_ml,
            abv,
        }
    }

    /// Reject values that would poison the estimator
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::Error::InvalidDrink("name must not be empty".into()));
        }
        if !self.volume_ml.is_finite() || self.volume_ml < 0.0 {
            return Err(crate::Error::InvalidDrink(format!(
                "volume_ml must be a non-negative number, got {}",
                self.volume_ml
            )));
        }
        if !self.abv.is_finite() || !(0.0..=1.0).contains(&self.abv) {
            return Err(crate::Error::InvalidDrink(format!(
                "abv must be a fraction between 0 and 1, got {}",
                self.abv
            )));
        }
        Ok(())
    }

    /// Stamp the drink at `now`
    pub fn into_event(self, now: DateTime<Utc>) -> DrinkEvent {
        DrinkEvent {
            timestamp: unix_seconds(now),
            name: self.name,
            volume_ml: self.volume_ml,
            abv: self.abv,
        }
    }
}

/// Fractional unix seconds for a datetime (microsecond precision)
pub fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

/// Inverse of [`unix_seconds`]; `None` for non-finite or out-of-range input
pub fn from_unix_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let micros = (secs * 1_000_000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    let micros = micros as i64;
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::from_timestamp(micros.div_euclid(1_000_000), nanos)
}

// ============================================================================
// Reminder Types
// ============================================================================

/// Persisted "last occurrence" record of the reminder page.
///
/// Stored as `{"last_text_time": "<RFC 3339 with offset>"}`, always written in UTC.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderState {
    #[serde(rename = "last_text_time", with = "rfc3339_offset")]
    pub last_event_time: DateTime<Utc>,
}

mod rfc3339_offset {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        // `+00:00` rather than `Z` keeps the offset explicit
        s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Micros, false))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Status Tiers
// ============================================================================

/// Alcohol status, ordered by severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlcoholTier {
    Sober,
    UnderLimit,
    OverLimit,
}

impl AlcoholTier {
    pub fn label(self) -> &'static str {
        match self {
            AlcoholTier::Sober => "sober",
            AlcoholTier::UnderLimit => "under_limit",
            AlcoholTier::OverLimit => "over_limit",
        }
    }
}

impl fmt::Display for AlcoholTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reminder urgency, ordered by elapsed time since the last event
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReminderTier {
    Safe,
    DangerZone,
    Warning,
    Critical,
}

impl ReminderTier {
    pub fn label(self) -> &'static str {
        match self {
            ReminderTier::Safe => "safe",
            ReminderTier::DangerZone => "danger_zone",
            ReminderTier::Warning => "warning",
            ReminderTier::Critical => "critical",
        }
    }
}

impl fmt::Display for ReminderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Estimator Inputs
// ============================================================================

/// Body parameters for the Widmark estimate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub mass_kg: f64,
    pub distribution_ratio: f64,
    /// Promille eliminated per hour
    pub elimination_rate: f64,
}

impl Default for SubjectProfile {
    fn default() -> Self {
        Self {
            mass_kg: 80.0,
            distribution_ratio: 0.68,
            elimination_rate: 0.15,
        }
    }
}
