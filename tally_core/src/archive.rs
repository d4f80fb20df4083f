//! CSV archive of the drink log.
//!
//! Before a reset the log can be appended to a CSV file so history survives
//! the wipe. The CSV is synced before the caller goes on to reset the log.

use crate::{DrinkEvent, Result};
use chrono::SecondsFormat;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    consumed_at: String,
    timestamp: f64,
    name: String,
    volume_ml: f64,
    abv: f64,
}

impl From<&DrinkEvent> for CsvRow {
    fn from(event: &DrinkEvent) -> Self {
        CsvRow {
            consumed_at: event
                .occurred_at()
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            timestamp: event.timestamp,
            name: event.name.clone(),
            volume_ml: event.volume_ml,
            abv: event.abv,
        }
    }
}

/// Append `events` to the CSV archive at `csv_path`
///
/// Creates the file with headers if it is new or empty. Returns the number of
/// rows written.
pub fn archive_events(events: &[DrinkEvent], csv_path: &Path) -> Result<usize> {
    if events.is_empty() {
        tracing::info!("No drinks to archive");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for event in events {
        writer.serialize(CsvRow::from(event))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Archived {} drinks to {:?}", events.len(), csv_path);
    Ok(events.len())
}
