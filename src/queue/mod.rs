//! Execution queue coordination
//!
//! Tracks one submitted run through the runner's admission queue:
//! ticket bookkeeping, position updates ordered by message timestamp,
//! and the cancellation protocol.

pub mod cancel;

pub use cancel::{CancelBus, CancelSubscription};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Queue admission token issued by the job runner when no runner is
/// immediately available.
///
/// The wire position is 0-based (`position == 0` means next to run);
/// only [`QueueTicket::display_position`] is 1-based. Ticket ids are
/// minted by the runner, never locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTicket {
    pub ticket_id: String,
    pub position: u32,
    pub line_len: u32,
    pub runner_ids: Vec<String>,
}

impl QueueTicket {
    /// True when this ticket is next in line
    pub fn is_next(&self) -> bool {
        self.position == 0
    }

    /// User-facing 1-based label, e.g. `"1 of 2"`
    pub fn display_position(&self) -> String {
        format!("{} of {}", self.position + 1, self.line_len)
    }
}

/// A position message from the realtime stream.
///
/// Transport does not guarantee ordering, so each message carries the
/// timestamp it was produced at and the consumer sorts by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub position: u32,
    pub line_len: u32,
    pub at: DateTime<Utc>,
}

/// A log line from the realtime stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub line: String,
}

/// Run log kept sorted by entry timestamp regardless of arrival order
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry at its timestamp position.
    ///
    /// Entries with equal timestamps keep their arrival order.
    pub fn push(&mut self, entry: LogEntry) {
        let index = self
            .entries
            .partition_point(|existing| existing.at <= entry.at);
        self.entries.insert(index, entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.line.as_str())
    }
}

/// Lifecycle of one submitted run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Sent to the runner, outcome not yet applied
    Submitted,
    /// A runner picked the work up immediately
    Running { workflow_id: String, run_id: String },
    /// Capacity exhausted; waiting in line
    Queued { ticket: QueueTicket },
    Completed,
    Failed { error: String },
    Cancelled,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Failed { .. } | RunState::Cancelled
        )
    }
}

/// Tracks one run and owns its cancellation channel.
///
/// The tracker does not poll: position and status updates are fed in by
/// whatever transport the caller uses, and any number of observers may
/// read the state. Cancellation intent is published on the injected
/// [`CancelBus`]; the HTTP cancel call itself belongs to the component
/// that owns the decision.
#[derive(Debug)]
pub struct RunTracker {
    state: RunState,
    last_position_at: Option<DateTime<Utc>>,
    cancel_bus: CancelBus,
    log: RunLog,
}

impl RunTracker {
    /// Start tracking a freshly submitted run
    pub fn new(cancel_bus: CancelBus) -> Self {
        Self {
            state: RunState::Submitted,
            last_position_at: None,
            cancel_bus,
            log: RunLog::new(),
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn cancel_bus(&self) -> &CancelBus {
        &self.cancel_bus
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// The current ticket, while queued
    pub fn ticket(&self) -> Option<&QueueTicket> {
        match &self.state {
            RunState::Queued { ticket } => Some(ticket),
            _ => None,
        }
    }

    /// A runner accepted the work
    pub fn mark_running(&mut self, workflow_id: String, run_id: String) {
        if self.state.is_terminal() {
            warn!(%workflow_id, "ignoring running update on a finished run");
            return;
        }
        self.state = RunState::Running {
            workflow_id,
            run_id,
        };
    }

    /// The runner queued the work behind the given ticket
    pub fn mark_queued(&mut self, ticket: QueueTicket) {
        if self.state.is_terminal() {
            warn!(ticket_id = %ticket.ticket_id, "ignoring queue update on a finished run");
            return;
        }
        debug!(ticket_id = %ticket.ticket_id, position = ticket.position, "run queued");
        self.state = RunState::Queued { ticket };
    }

    pub fn mark_completed(&mut self) {
        self.state = RunState::Completed;
    }

    pub fn mark_failed(&mut self, error: String) {
        self.state = RunState::Failed { error };
    }

    /// The server confirmed the cancel; the run leaves the queue.
    ///
    /// Cancellation is not applied optimistically: a failed cancel call
    /// leaves the run visibly queued.
    pub fn mark_cancelled(&mut self) {
        self.state = RunState::Cancelled;
    }

    /// Apply a position message; returns false when it was stale.
    ///
    /// Messages are ordered by their own timestamps, not by arrival.
    pub fn apply_position_update(&mut self, update: PositionUpdate) -> bool {
        let RunState::Queued { ticket } = &mut self.state else {
            return false;
        };
        if self.last_position_at.is_some_and(|seen| update.at <= seen) {
            debug!(position = update.position, "dropping stale position update");
            return false;
        }
        ticket.position = update.position;
        ticket.line_len = update.line_len;
        self.last_position_at = Some(update.at);
        true
    }

    /// Record a log line, keeping the log timestamp-sorted
    pub fn append_log(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    /// Publish cancellation intent for the current ticket.
    ///
    /// Returns the ticket to cancel so the caller can make the HTTP
    /// call; `None` (and no emission) when the run is not queued.
    pub fn request_cancel(&self) -> Option<QueueTicket> {
        let ticket = self.ticket()?.clone();
        self.cancel_bus.emit_cancel_requested(&ticket.ticket_id);
        Some(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(position: u32, line_len: u32) -> QueueTicket {
        QueueTicket {
            ticket_id: "T-1".to_string(),
            position,
            line_len,
            runner_ids: vec!["runner-a".to_string()],
        }
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn test_display_position_is_one_based() {
        assert_eq!(ticket(0, 2).display_position(), "1 of 2");
        assert_eq!(ticket(1, 2).display_position(), "2 of 2");
        assert!(ticket(0, 2).is_next());
    }

    #[test]
    fn test_position_updates_ordered_by_timestamp() {
        let mut tracker = RunTracker::new(CancelBus::new());
        tracker.mark_queued(ticket(3, 4));

        assert!(tracker.apply_position_update(PositionUpdate {
            position: 1,
            line_len: 2,
            at: at(20),
        }));
        // Older message arriving later is dropped
        assert!(!tracker.apply_position_update(PositionUpdate {
            position: 2,
            line_len: 3,
            at: at(10),
        }));

        let ticket = tracker.ticket().unwrap();
        assert_eq!(ticket.position, 1);
        assert_eq!(ticket.line_len, 2);
    }

    #[test]
    fn test_position_update_ignored_when_not_queued() {
        let mut tracker = RunTracker::new(CancelBus::new());
        tracker.mark_running("wf-1".to_string(), "run-1".to_string());
        assert!(!tracker.apply_position_update(PositionUpdate {
            position: 0,
            line_len: 1,
            at: at(5),
        }));
    }

    #[test]
    fn test_request_cancel_emits_ticket_id() {
        use std::sync::{Arc, Mutex};

        let bus = CancelBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = bus.on_cancel_requested(move |id| sink.lock().unwrap().push(id.to_string()));

        let mut tracker = RunTracker::new(bus);
        tracker.mark_queued(ticket(1, 2));

        let to_cancel = tracker.request_cancel().unwrap();
        assert_eq!(to_cancel.ticket_id, "T-1");
        assert_eq!(*seen.lock().unwrap(), vec!["T-1"]);

        // Still queued: cancellation is not applied optimistically
        assert!(matches!(tracker.state(), RunState::Queued { .. }));
    }

    #[test]
    fn test_request_cancel_noop_when_not_queued() {
        let tracker = RunTracker::new(CancelBus::new());
        assert!(tracker.request_cancel().is_none());
    }

    #[test]
    fn test_terminal_states_ignore_late_updates() {
        let mut tracker = RunTracker::new(CancelBus::new());
        tracker.mark_queued(ticket(0, 1));
        tracker.mark_cancelled();
        tracker.mark_running("wf-1".to_string(), "run-1".to_string());
        assert_eq!(tracker.state(), &RunState::Cancelled);
    }

    #[test]
    fn test_run_log_sorts_by_timestamp() {
        let mut log = RunLog::new();
        log.push(LogEntry {
            at: at(30),
            line: "third".to_string(),
        });
        log.push(LogEntry {
            at: at(10),
            line: "first".to_string(),
        });
        log.push(LogEntry {
            at: at(20),
            line: "second".to_string(),
        });

        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_run_log_equal_timestamps_keep_arrival_order() {
        let mut log = RunLog::new();
        log.push(LogEntry {
            at: at(10),
            line: "a".to_string(),
        });
        log.push(LogEntry {
            at: at(10),
            line: "b".to_string(),
        });
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines, vec!["a", "b"]);
    }
}
