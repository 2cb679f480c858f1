//! Edit log reader
//!
//! Reads the tabular edit log export into [`EditEvent`]s. Expected columns
//! (matched by header name, any order, extra columns ignored):
//!
//! | Column | Content |
//! |--------|---------|
//! | `User Email` | may be blank; such rows are dropped later by normalization |
//! | `User Name` | may be blank, same as above |
//! | `Time` | timestamp, see [`parse_timestamp`] |
//! | `Edit Type` | free-form label |
//! | `Is Undo` | `true`/`false`, `1`/`0` or `yes`/`no`; a blank cell skips the row |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{EditEvent, Timestamp};

/// One CSV row as it appears in the file.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "User Email", default)]
    user_email: String,
    #[serde(rename = "User Name", default)]
    user_name: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Edit Type", default)]
    edit_type: String,
    #[serde(rename = "Is Undo")]
    is_undo: String,
}

/// Formats carrying an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Formats without an offset; read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a `Time` cell.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff][±HH:MM]`,
/// `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]` and a bare `YYYY-MM-DD` (midnight).
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts);
    }
    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some(naive.and_utc().fixed_offset())
}

/// Parse an `Is Undo` cell.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Read edit events from any CSV reader.
///
/// Rows with a blank `Is Undo` cell are skipped, since they cannot be
/// confirmed as regular edits. Fails on the first row whose `Time` or
/// non-blank `Is Undo` cannot be parsed.
pub fn read_events<R: Read>(reader: R) -> Result<Vec<EditEvent>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut events = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: RawRow = record.deserialize(Some(&headers))?;
        match into_event(row, line)? {
            Some(event) => events.push(event),
            None => skipped += 1,
        }
    }

    tracing::debug!(rows = events.len(), skipped, "Read edit log");
    Ok(events)
}

/// Read edit events from a CSV file.
pub fn read_events_from_path(path: impl AsRef<Path>) -> Result<Vec<EditEvent>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    tracing::info!(path = %path.display(), "Reading edit log");
    read_events(file)
}

fn into_event(row: RawRow, line: u64) -> Result<Option<EditEvent>> {
    let timestamp = parse_timestamp(&row.time).ok_or_else(|| {
        tracing::warn!(line, time = %row.time, "Unparseable timestamp");
        Error::Parse {
            line,
            message: format!("invalid timestamp '{}'", row.time),
        }
    })?;

    if row.is_undo.is_empty() {
        tracing::debug!(line, "Skipping row without undo flag");
        return Ok(None);
    }

    let is_undo = parse_bool(&row.is_undo).ok_or_else(|| {
        tracing::warn!(line, is_undo = %row.is_undo, "Unparseable undo flag");
        Error::Parse {
            line,
            message: format!("invalid Is Undo value '{}'", row.is_undo),
        }
    })?;

    Ok(Some(EditEvent {
        user_email: row.user_email,
        user_name: row.user_name,
        timestamp,
        edit_type: row.edit_type,
        is_undo,
    }))
}
