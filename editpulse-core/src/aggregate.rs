//! Summary aggregation
//!
//! Collapses sessions into one row per (date, user email, edit type),
//! summing occurrences and time spent.

use std::collections::BTreeMap;

use crate::types::{Session, Summary, SummaryKey, SummaryRow};

/// Running totals for one summary key.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    occurrences: u64,
    time_spent_seconds: f64,
}

impl Totals {
    fn merge(self, session: &Session) -> Self {
        Self {
            occurrences: self.occurrences + session.occurrences,
            time_spent_seconds: self.time_spent_seconds + session.duration_secs(),
        }
    }
}

/// Group sessions by (date, user email, edit type).
///
/// Rows come out ordered by date, then user email, then edit type. An empty
/// session list yields an empty summary.
pub fn aggregate_sessions(sessions: &[Session]) -> Summary {
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.start_time);

    let mut groups: BTreeMap<SummaryKey, Totals> = BTreeMap::new();
    for session in ordered {
        let key = SummaryKey {
            date: session.date,
            user_email: session.user_email.clone(),
            edit_type: session.edit_type.clone(),
        };
        let totals = groups.entry(key).or_default();
        *totals = totals.merge(session);
    }

    let rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|(key, totals)| SummaryRow {
            date: key.date,
            user_email: key.user_email,
            edit_type: key.edit_type,
            occurrences: totals.occurrences,
            time_spent_seconds: totals.time_spent_seconds,
        })
        .collect();

    tracing::debug!(
        sessions = sessions.len(),
        rows = rows.len(),
        "Aggregated sessions"
    );

    Summary {
        summarized_logs: rows.len(),
        rows,
    }
}
