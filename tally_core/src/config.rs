//! Configuration file support for Tally.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/tally/config.toml`.

use crate::classify::{alcohol_table, reminder_table, AlcoholTable, ReminderTable};
use crate::{Error, Result, SubjectProfile};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub subject: SubjectConfig,

    #[serde(default)]
    pub alcohol: AlcoholConfig,

    #[serde(default)]
    pub reminder: ReminderConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Body parameters for the alcohol estimate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubjectConfig {
    #[serde(default = "default_mass_kg")]
    pub mass_kg: f64,

    #[serde(default = "default_distribution_ratio")]
    pub distribution_ratio: f64,

    #[serde(default = "default_elimination_rate")]
    pub elimination_rate: f64,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            mass_kg: default_mass_kg(),
            distribution_ratio: default_distribution_ratio(),
            elimination_rate: default_elimination_rate(),
        }
    }
}

/// Alcohol classification
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlcoholConfig {
    /// Promille at or above which driving is over the limit
    #[serde(default = "default_legal_limit")]
    pub legal_limit: f64,
}

impl Default for AlcoholConfig {
    fn default() -> Self {
        Self {
            legal_limit: default_legal_limit(),
        }
    }
}

/// Reminder escalation thresholds, in seconds since the last event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_danger_zone_secs")]
    pub danger_zone_secs: i64,

    #[serde(default = "default_warning_secs")]
    pub warning_secs: i64,

    #[serde(default = "default_critical_secs")]
    pub critical_secs: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            danger_zone_secs: default_danger_zone_secs(),
            warning_secs: default_warning_secs(),
            critical_secs: default_critical_secs(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("tally")
}

fn default_mass_kg() -> f64 {
    80.0
}

fn default_distribution_ratio() -> f64 {
    0.68
}

fn default_elimination_rate() -> f64 {
    0.15
}

fn default_legal_limit() -> f64 {
    // Belgian limit, promille
    0.5
}

fn default_danger_zone_secs() -> i64 {
    2 * 60
}

fn default_warning_secs() -> i64 {
    15 * 60
}

fn default_critical_secs() -> i64 {
    60 * 60
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("tally").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check value ranges and threshold ordering
    pub fn validate(&self) -> Result<()> {
        let s = &self.subject;
        if !(s.mass_kg.is_finite() && s.mass_kg > 0.0) {
            return Err(Error::Config(format!(
                "subject.mass_kg must be positive, got {}",
                s.mass_kg
            )));
        }
        if !(s.distribution_ratio.is_finite() && s.distribution_ratio > 0.0) {
            return Err(Error::Config(format!(
                "subject.distribution_ratio must be positive, got {}",
                s.distribution_ratio
            )));
        }
        if !(s.elimination_rate.is_finite() && s.elimination_rate >= 0.0) {
            return Err(Error::Config(format!(
                "subject.elimination_rate must be non-negative, got {}",
                s.elimination_rate
            )));
        }
        if !(self.alcohol.legal_limit.is_finite() && self.alcohol.legal_limit > 0.0) {
            return Err(Error::Config(format!(
                "alcohol.legal_limit must be positive, got {}",
                self.alcohol.legal_limit
            )));
        }

        // Building the tables checks threshold ordering
        self.alcohol_table()?;
        self.reminder_table()?;
        Ok(())
    }

    pub fn profile(&self) -> SubjectProfile {
        SubjectProfile {
            mass_kg: self.subject.mass_kg,
            distribution_ratio: self.subject.distribution_ratio,
            elimination_rate: self.subject.elimination_rate,
        }
    }

    pub fn alcohol_table(&self) -> Result<AlcoholTable> {
        alcohol_table(self.alcohol.legal_limit)
    }

    pub fn reminder_table(&self) -> Result<ReminderTable> {
        let r = &self.reminder;
        reminder_table(
            reminder_secs("danger_zone_secs", r.danger_zone_secs)?,
            reminder_secs("warning_secs", r.warning_secs)?,
            reminder_secs("critical_secs", r.critical_secs)?,
        )
    }
}

fn reminder_secs(key: &str, secs: i64) -> Result<Duration> {
    Duration::try_seconds(secs).ok_or_else(|| {
        Error::Config(format!("reminder.{} is out of range, got {}", key, secs))
    })
}
