//! Core domain types for editpulse
//!
//! These types describe the data flowing through the summary pipeline:
//!
//! | Term | Definition |
//! |------|------------|
//! | **EditEvent** | One row of the edit log: who edited, when, and what kind of edit |
//! | **Session** | A contiguous run of same-type edits by one user |
//! | **SummaryRow** | Sessions re-aggregated by (date, user email, edit type) |
//! | **TimeThreshold** | Largest gap between two edits that still belongs to one session |
//! | **DedupScope** | Whether duplicate timestamps are detected across all users or per user |

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Point in time of an edit. Values read without an offset are stored as UTC.
pub type Timestamp = DateTime<FixedOffset>;

// ============================================
// Input
// ============================================

/// A single edit log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditEvent {
    pub user_email: String,
    pub user_name: String,
    pub timestamp: Timestamp,
    /// Opaque label, only ever compared for equality
    pub edit_type: String,
    pub is_undo: bool,
}

impl EditEvent {
    /// Create a non-undo event.
    pub fn new(
        user_email: impl Into<String>,
        user_name: impl Into<String>,
        timestamp: Timestamp,
        edit_type: impl Into<String>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            user_name: user_name.into(),
            timestamp,
            edit_type: edit_type.into(),
            is_undo: false,
        }
    }

    /// Mark this event as an undo.
    pub fn undo(mut self) -> Self {
        self.is_undo = true;
        self
    }

    /// Whether both identity fields are present.
    pub fn has_identity(&self) -> bool {
        !self.user_email.is_empty() && !self.user_name.is_empty()
    }
}

// ============================================
// Sessions
// ============================================

/// A closed run of same-type edits by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_email: String,
    pub edit_type: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Number of events merged into this session (always >= 1)
    pub occurrences: u64,
    /// Calendar date of `start_time`, in its own offset
    pub date: NaiveDate,
}

impl Session {
    /// Time between the first and last event of the session, in seconds.
    pub fn duration_secs(&self) -> f64 {
        let elapsed = self.end_time - self.start_time;
        match elapsed.num_microseconds() {
            Some(micros) => micros as f64 / 1_000_000.0,
            None => elapsed.num_milliseconds() as f64 / 1000.0,
        }
    }
}

// ============================================
// Summary
// ============================================

/// Grouping key of the summary table.
///
/// Field order defines row order: date, then user email, then edit type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SummaryKey {
    pub date: NaiveDate,
    pub user_email: String,
    pub edit_type: String,
}

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub user_email: String,
    pub edit_type: String,
    pub occurrences: u64,
    pub time_spent_seconds: f64,
}

/// Aggregated summary with its row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
    /// Number of rows, reported alongside the data for diagnostics
    pub summarized_logs: usize,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of occurrences over all rows.
    pub fn total_occurrences(&self) -> u64 {
        self.rows.iter().map(|r| r.occurrences).sum()
    }

    /// Sum of time spent over all rows, in seconds.
    pub fn total_time_spent_seconds(&self) -> f64 {
        self.rows.iter().map(|r| r.time_spent_seconds).sum()
    }
}

// ============================================
// Options
// ============================================

/// Scope used when dropping events that share a timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupScope {
    /// One event per timestamp across the whole log
    #[default]
    Global,
    /// One event per timestamp for each user
    #[serde(alias = "per-user")]
    PerUser,
}

impl DedupScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupScope::Global => "global",
            DedupScope::PerUser => "per_user",
        }
    }
}

impl std::str::FromStr for DedupScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "global" => Ok(DedupScope::Global),
            "per_user" | "per-user" => Ok(DedupScope::PerUser),
            _ => Err(format!("unknown dedup scope: {}", s)),
        }
    }
}

impl fmt::Display for DedupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maximum gap between consecutive edits of one session.
///
/// Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeThreshold(Duration);

impl TimeThreshold {
    /// Build a threshold from a number of minutes (fractions allowed).
    pub fn from_minutes(minutes: f64) -> Result<Self> {
        if !minutes.is_finite() {
            return Err(Error::Config(format!(
                "time threshold must be a finite number of minutes, got {}",
                minutes
            )));
        }
        if minutes <= 0.0 {
            return Err(Error::Config(format!(
                "time threshold must be greater than zero minutes, got {}",
                minutes
            )));
        }

        let millis = (minutes * 60_000.0).round();
        if !millis.is_finite() || millis >= i64::MAX as f64 {
            return Err(Error::Config(format!(
                "time threshold of {} minutes is out of range",
                minutes
            )));
        }

        match Duration::try_milliseconds(millis as i64) {
            Some(d) if d > Duration::zero() => Ok(Self(d)),
            _ => Err(Error::Config(format!(
                "time threshold of {} minutes is out of range",
                minutes
            ))),
        }
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Threshold expressed in minutes.
    pub fn minutes(&self) -> f64 {
        self.0.num_milliseconds() as f64 / 60_000.0
    }
}

impl Default for TimeThreshold {
    fn default() -> Self {
        Self(Duration::minutes(30))
    }
}

impl fmt::Display for TimeThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.minutes())
    }
}
