//! Session segmentation
//!
//! Splits each user's time-ordered events into sessions. A session is a run
//! of events with the same edit type where no two consecutive events are
//! further apart than the [`TimeThreshold`]. The gap is always measured from
//! the previous event of the run, so a long session can grow indefinitely as
//! long as the user keeps editing.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::types::{EditEvent, Session, TimeThreshold, Timestamp};

/// The session currently being built for one user.
#[derive(Debug, Clone)]
struct Run<'a> {
    edit_type: &'a str,
    start_time: Timestamp,
    end_time: Timestamp,
    occurrences: u64,
}

impl<'a> Run<'a> {
    fn open(event: &'a EditEvent) -> Self {
        Self {
            edit_type: &event.edit_type,
            start_time: event.timestamp,
            end_time: event.timestamp,
            occurrences: 1,
        }
    }

    /// Whether `event` has to start a new session.
    fn breaks_on(&self, event: &EditEvent, threshold: Duration) -> bool {
        event.timestamp - self.end_time > threshold || event.edit_type != self.edit_type
    }

    fn extend(mut self, event: &EditEvent) -> Self {
        self.end_time = event.timestamp;
        self.occurrences += 1;
        self
    }

    fn close(self, user_email: &str) -> Session {
        Session {
            user_email: user_email.to_string(),
            edit_type: self.edit_type.to_string(),
            start_time: self.start_time,
            end_time: self.end_time,
            occurrences: self.occurrences,
            date: self.start_time.date_naive(),
        }
    }
}

/// Segment one user's events, which must already be in time order.
pub fn segment_user(
    user_email: &str,
    events: &[&EditEvent],
    threshold: TimeThreshold,
) -> Vec<Session> {
    let threshold = threshold.as_duration();

    let (mut sessions, open) = events.iter().fold(
        (Vec::new(), None::<Run>),
        |(mut sessions, run), &event| {
            let run = match run {
                None => Run::open(event),
                Some(run) if run.breaks_on(event, threshold) => {
                    sessions.push(run.close(user_email));
                    Run::open(event)
                }
                Some(run) => run.extend(event),
            };
            (sessions, Some(run))
        },
    );

    if let Some(run) = open {
        sessions.push(run.close(user_email));
    }
    sessions
}

/// Segment normalized events into sessions, one list per user concatenated
/// in user email order.
///
/// Each user's events must be in ascending time order, which
/// [`normalize_events`](crate::normalize::normalize_events) guarantees.
pub fn segment_sessions(events: &[EditEvent], threshold: TimeThreshold) -> Vec<Session> {
    let mut partitions: BTreeMap<&str, Vec<&EditEvent>> = BTreeMap::new();
    for event in events {
        partitions
            .entry(event.user_email.as_str())
            .or_default()
            .push(event);
    }

    let sessions: Vec<Session> = partitions
        .iter()
        .flat_map(|(user_email, user_events)| segment_user(user_email, user_events, threshold))
        .collect();

    tracing::debug!(
        users = partitions.len(),
        events = events.len(),
        sessions = sessions.len(),
        threshold = %threshold,
        "Segmented edit sessions"
    );

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn event(time: &str, kind: &str) -> EditEvent {
        EditEvent::new("user@example.com", "User", ts(time), kind)
    }

    fn minutes(m: f64) -> TimeThreshold {
        TimeThreshold::from_minutes(m).unwrap()
    }

    #[test]
    fn test_single_event_is_zero_length_session() {
        let events = vec![event("2024-03-01T09:00:00Z", "edit")];
        let sessions = segment_sessions(&events, minutes(30.0));

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, sessions[0].end_time);
        assert_eq!(sessions[0].occurrences, 1);
        assert_eq!(sessions[0].duration_secs(), 0.0);
    }

    #[test]
    fn test_reference_scenario() {
        let events = vec![
            event("2024-03-01T09:00:00Z", "edit"),
            event("2024-03-01T09:10:00Z", "edit"),
            event("2024-03-01T09:50:00Z", "edit"),
            event("2024-03-01T09:55:00Z", "comment"),
        ];
        let sessions = segment_sessions(&events, minutes(30.0));

        assert_eq!(sessions.len(), 3);

        assert_eq!(sessions[0].edit_type, "edit");
        assert_eq!(sessions[0].start_time, ts("2024-03-01T09:00:00Z"));
        assert_eq!(sessions[0].end_time, ts("2024-03-01T09:10:00Z"));
        assert_eq!(sessions[0].occurrences, 2);

        assert_eq!(sessions[1].edit_type, "edit");
        assert_eq!(sessions[1].start_time, ts("2024-03-01T09:50:00Z"));
        assert_eq!(sessions[1].end_time, ts("2024-03-01T09:50:00Z"));
        assert_eq!(sessions[1].occurrences, 1);

        assert_eq!(sessions[2].edit_type, "comment");
        assert_eq!(sessions[2].start_time, ts("2024-03-01T09:55:00Z"));
        assert_eq!(sessions[2].occurrences, 1);
    }

    #[test]
    fn test_gap_equal_to_threshold_merges() {
        let events = vec![
            event("2024-03-01T09:00:00Z", "edit"),
            event("2024-03-01T09:30:00Z", "edit"),
        ];
        let sessions = segment_sessions(&events, minutes(30.0));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].occurrences, 2);
        assert_eq!(sessions[0].duration_secs(), 1800.0);
    }

    #[test]
    fn test_gap_one_second_over_threshold_splits() {
        let events = vec![
            event("2024-03-01T09:00:00Z", "edit"),
            event("2024-03-01T09:30:01Z", "edit"),
        ];
        let sessions = segment_sessions(&events, minutes(30.0));
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_type_change_without_gap_splits() {
        let events = vec![
            event("2024-03-01T09:00:00Z", "edit"),
            event("2024-03-01T09:00:00.500Z", "comment"),
        ];
        let sessions = segment_sessions(&events, minutes(30.0));
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].edit_type, "edit");
        assert_eq!(sessions[1].edit_type, "comment");
    }

    #[test]
    fn test_type_change_at_same_instant_splits() {
        let events = vec![
            event("2024-03-01T09:00:00Z", "edit"),
            event("2024-03-01T09:00:00Z", "comment"),
        ];
        let sessions = segment_sessions(&events, minutes(30.0));

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].edit_type, "edit");
        assert_eq!(sessions[0].occurrences, 1);
        assert_eq!(sessions[1].edit_type, "comment");
        assert_eq!(sessions[1].occurrences, 1);
        assert_eq!(sessions[0].end_time, sessions[1].start_time);
    }

    #[test]
    fn test_gap_measured_from_last_event() {
        // Each step is 20 minutes; the run spans an hour with a 30 minute threshold
        let events = vec![
            event("2024-03-01T09:00:00Z", "edit"),
            event("2024-03-01T09:20:00Z", "edit"),
            event("2024-03-01T09:40:00Z", "edit"),
            event("2024-03-01T10:00:00Z", "edit"),
        ];
        let sessions = segment_sessions(&events, minutes(30.0));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].occurrences, 4);
        assert_eq!(sessions[0].duration_secs(), 3600.0);
    }

    #[test]
    fn test_users_are_segmented_independently() {
        let events = vec![
            EditEvent::new("a@example.com", "A", ts("2024-03-01T09:00:00Z"), "edit"),
            EditEvent::new("a@example.com", "A", ts("2024-03-01T09:05:00Z"), "edit"),
            EditEvent::new("b@example.com", "B", ts("2024-03-01T09:01:00Z"), "edit"),
        ];
        let sessions = segment_sessions(&events, minutes(30.0));

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].user_email, "a@example.com");
        assert_eq!(sessions[0].occurrences, 2);
        assert_eq!(sessions[1].user_email, "b@example.com");
        assert_eq!(sessions[1].occurrences, 1);
    }

    #[test]
    fn test_sessions_cover_events_without_overlap() {
        let times = [
            ("2024-03-01T08:00:00Z", "edit"),
            ("2024-03-01T08:10:00Z", "edit"),
            ("2024-03-01T08:11:00Z", "comment"),
            ("2024-03-01T09:30:00Z", "comment"),
            ("2024-03-01T09:31:00Z", "comment"),
            ("2024-03-01T09:45:00Z", "edit"),
        ];
        let events: Vec<_> = times.iter().map(|(t, k)| event(t, k)).collect();
        let sessions = segment_sessions(&events, minutes(30.0));

        let total: u64 = sessions.iter().map(|s| s.occurrences).sum();
        assert_eq!(total, events.len() as u64);

        for pair in sessions.windows(2) {
            assert!(pair[0].end_time <= pair[1].start_time);
        }
        assert_eq!(sessions.first().unwrap().start_time, events[0].timestamp);
        assert_eq!(
            sessions.last().unwrap().end_time,
            events.last().unwrap().timestamp
        );
    }

    #[test]
    fn test_session_date_uses_local_offset() {
        let events = vec![EditEvent::new(
            "user@example.com",
            "User",
            ts("2024-03-01T23:30:00-05:00"),
            "edit",
        )];
        let sessions = segment_sessions(&events, minutes(30.0));
        assert_eq!(
            sessions[0].date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_no_events_no_sessions() {
        assert!(segment_sessions(&[], minutes(30.0)).is_empty());
    }
}
