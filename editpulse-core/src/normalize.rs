//! Event normalization
//!
//! Turns raw edit log records into the ordered sequence the segmenter expects:
//!
//! 1. Records without a user email or user name are dropped
//! 2. Undo events are dropped
//! 3. Records sharing a timestamp are collapsed to the first one seen
//! 4. The survivors are sorted by user email, then timestamp
//!
//! Step 3 is a deliberate simplification, not data loss: a second event at
//! the exact same instant adds no time to any session, so only the first
//! one in input order is counted. With [`DedupScope::Global`]
//! the comparison spans all users, which also collapses edits of different
//! users that land on the same instant. [`DedupScope::PerUser`] limits it to
//! a single user's events.

use std::collections::HashSet;

use crate::types::{DedupScope, EditEvent};

/// Accepted events, ordered by `(user_email, timestamp)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedEvents {
    pub events: Vec<EditEvent>,
    /// Number of accepted records
    pub total_logs: usize,
}

impl NormalizedEvents {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Filter, deduplicate and sort raw events.
pub fn normalize_events<I>(events: I, scope: DedupScope) -> NormalizedEvents
where
    I: IntoIterator<Item = EditEvent>,
{
    let mut seen = HashSet::new();
    let mut received = 0usize;

    let mut accepted: Vec<EditEvent> = events
        .into_iter()
        .inspect(|_| received += 1)
        .filter(|e| e.has_identity() && !e.is_undo)
        .filter(|e| {
            let key = match scope {
                DedupScope::Global => (None, e.timestamp),
                DedupScope::PerUser => (Some(e.user_email.clone()), e.timestamp),
            };
            seen.insert(key)
        })
        .collect();

    // Stable, so equal keys keep input order
    accepted.sort_by(|a, b| {
        a.user_email
            .cmp(&b.user_email)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    tracing::debug!(
        received,
        accepted = accepted.len(),
        scope = %scope,
        "Normalized edit events"
    );

    NormalizedEvents {
        total_logs: accepted.len(),
        events: accepted,
    }
}
