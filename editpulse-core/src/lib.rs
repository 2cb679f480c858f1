//! # editpulse-core
//!
//! Core library for editpulse - a work session summarizer for edit logs.
//!
//! This library provides:
//! - Domain types for edit events, sessions and summary rows
//! - The normalize → segment → aggregate pipeline
//! - CSV reading of edit logs and pluggable summary sinks
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Pipeline
//!
//! - **Normalize:** drop anonymous and undo events, collapse duplicate
//!   timestamps, sort by user and time
//! - **Segment:** split each user's events into sessions on a time gap larger
//!   than the threshold or a change of edit type
//! - **Aggregate:** sum occurrences and time spent per (date, user, edit type)
//!
//! The pipeline itself is pure; reading and writing files happens in
//! [`source`] and [`sink`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use editpulse_core::sink::CsvSink;
//! use editpulse_core::{source, summarize_into, Config};
//!
//! let config = Config::load().expect("failed to load config");
//! let options = config.summary.options().expect("invalid summary settings");
//!
//! let events = source::read_events_from_path("input.csv").expect("failed to read log");
//! let mut sink = CsvSink::create("output.csv").expect("failed to create output");
//! let report = summarize_into(events, &options, &mut sink).expect("failed to store summary");
//! println!("{} rows", report.summarized_logs());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{summarize, summarize_into, SummaryOptions, SummaryReport};
pub use sink::SummarySink;
pub use types::*;

// Public modules
pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod segment;
pub mod sink;
pub mod source;
pub mod types;
