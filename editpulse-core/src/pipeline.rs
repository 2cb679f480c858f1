//! End-to-end summary pipeline
//!
//! normalize → segment → aggregate, with persistence delegated to a
//! [`SummarySink`].

use crate::aggregate::aggregate_sessions;
use crate::error::Result;
use crate::normalize::normalize_events;
use crate::segment::segment_sessions;
use crate::sink::SummarySink;
use crate::types::{DedupScope, EditEvent, Summary, TimeThreshold};

/// Tunables of a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryOptions {
    pub threshold: TimeThreshold,
    pub dedup_scope: DedupScope,
}

impl SummaryOptions {
    pub fn new(threshold: TimeThreshold) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    pub fn with_dedup_scope(mut self, dedup_scope: DedupScope) -> Self {
        self.dedup_scope = dedup_scope;
        self
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryReport {
    /// Accepted records after normalization
    pub total_logs: usize,
    /// Sessions found before aggregation
    pub session_count: usize,
    pub summary: Summary,
}

impl SummaryReport {
    /// Number of summary rows.
    pub fn summarized_logs(&self) -> usize {
        self.summary.summarized_logs
    }
}

/// Run the pipeline over raw events.
pub fn summarize<I>(events: I, options: &SummaryOptions) -> SummaryReport
where
    I: IntoIterator<Item = EditEvent>,
{
    let normalized = normalize_events(events, options.dedup_scope);
    let sessions = segment_sessions(&normalized.events, options.threshold);
    let summary = aggregate_sessions(&sessions);

    tracing::info!(
        total_logs = normalized.total_logs,
        sessions = sessions.len(),
        summarized_logs = summary.summarized_logs,
        threshold = %options.threshold,
        dedup_scope = %options.dedup_scope,
        "Summarized edit log"
    );

    SummaryReport {
        total_logs: normalized.total_logs,
        session_count: sessions.len(),
        summary,
    }
}

/// Run the pipeline and hand the summary to `sink`.
pub fn summarize_into<I>(
    events: I,
    options: &SummaryOptions,
    sink: &mut dyn SummarySink,
) -> Result<SummaryReport>
where
    I: IntoIterator<Item = EditEvent>,
{
    let report = summarize(events, options);
    sink.store(&report.summary)?;
    Ok(report)
}
