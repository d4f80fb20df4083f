//! Error types for the tally_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tally_core operations
///
/// Only mutating operations surface storage errors. Reads of the drink log
/// and reminder file degrade to defaults instead of returning these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Drink fields rejected before being written to the log
    #[error("Invalid drink: {0}")]
    InvalidDrink(String),

    /// Drink id not present in the menu
    #[error("Unknown drink: {0}")]
    UnknownDrink(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
