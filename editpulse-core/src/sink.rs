//! Summary sinks
//!
//! The pipeline never touches the filesystem itself. Callers hand it a
//! [`SummarySink`] that decides where the finished summary goes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::types::{Summary, SummaryRow};

/// Destination for a finished summary.
pub trait SummarySink {
    /// Persist the summary rows.
    fn store(&mut self, summary: &Summary) -> Result<()>;
}

/// Column layout of the exported CSV.
#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "User Email")]
    user_email: &'a str,
    #[serde(rename = "Edit Type")]
    edit_type: &'a str,
    #[serde(rename = "Occurrences")]
    occurrences: u64,
    #[serde(rename = "Time Spent")]
    time_spent: f64,
}

impl<'a> From<&'a SummaryRow> for CsvRow<'a> {
    fn from(row: &'a SummaryRow) -> Self {
        Self {
            date: row.date,
            user_email: &row.user_email,
            edit_type: &row.edit_type,
            occurrences: row.occurrences,
            time_spent: row.time_spent_seconds,
        }
    }
}

/// Header written even when there are no rows.
const CSV_HEADER: [&str; 5] = ["Date", "User Email", "Edit Type", "Occurrences", "Time Spent"];

/// Writes the summary as CSV with a header row.
pub struct CsvSink<W: Write> {
    writer: W,
    path: Option<PathBuf>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, path: None }
    }

    /// Path of the file being written, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CsvSink<BufWriter<File>> {
    /// Create (or truncate) a CSV file, creating parent directories as needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: Some(path.to_path_buf()),
        })
    }
}

impl<W: Write> SummarySink for CsvSink<W> {
    fn store(&mut self, summary: &Summary) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut self.writer);

        writer.write_record(CSV_HEADER)?;
        for row in &summary.rows {
            writer.serialize(CsvRow::from(row))?;
        }
        writer.flush()?;
        drop(writer);
        self.writer.flush()?;

        if let Some(path) = &self.path {
            tracing::info!(
                path = %path.display(),
                rows = summary.rows.len(),
                "Summary written"
            );
        }
        Ok(())
    }
}

/// Writes the summary rows as a pretty-printed JSON array.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SummarySink for JsonSink<W> {
    fn store(&mut self, summary: &Summary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &summary.rows)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps stored rows in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<SummaryRow>,
}

impl SummarySink for MemorySink {
    fn store(&mut self, summary: &Summary) -> Result<()> {
        self.rows.extend(summary.rows.iter().cloned());
        Ok(())
    }
}
