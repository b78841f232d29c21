//! Outcome of one replay step.

use vdebug_types::{ContentHash, Event, PendingSendHandle, Route};

/// What the correlator made of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
    /// The event is not a network send or receive.
    Untracked,

    /// A send or receive whose payload lacks `src`, `dst` or `msg`.
    Unroutable,

    /// A send now waiting for its receive.
    Sent {
        /// Handle of the recorded send.
        handle: PendingSendHandle,
    },

    /// A receive paired with an earlier send.
    Matched {
        /// Handle the receive consumed.
        handle: PendingSendHandle,
        /// Index of the send event within the test.
        send_index: usize,
    },

    /// A receive with no pending send on its route. The log is inconsistent.
    Unmatched {
        /// Route of the receive.
        route: Route,
        /// Content hash of the received message.
        key: ContentHash,
    },
}

impl Correlation {
    /// Check if this outcome points at a log inconsistency.
    pub fn is_warning(&self) -> bool {
        matches!(self, Correlation::Unroutable | Correlation::Unmatched { .. })
    }

    /// Index of the partner send event, for receives that matched.
    pub fn send_index(&self) -> Option<usize> {
        match self {
            Correlation::Matched { send_index, .. } => Some(*send_index),
            _ => None,
        }
    }
}

/// Result of stepping forward once.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// The event that was applied.
    pub event: Event,

    /// Correlator outcome for the event.
    pub correlation: Correlation,

    /// Cursor position after the step (number of events applied).
    pub position: usize,

    /// Total number of events in the test.
    pub total: usize,
}

impl StepReport {
    /// Check if this step applied the test's last event.
    pub fn is_last(&self) -> bool {
        self.position == self.total
    }

    /// Progress text, e.g. `"Event: #3/10"`.
    pub fn progress(&self) -> String {
        format!("Event: #{}/{}", self.position, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdebug_types::{EventKind, SendId};

    fn handle() -> PendingSendHandle {
        PendingSendHandle {
            id: SendId(0),
            route: Route::new("1", "2"),
            key: ContentHash::from_bytes(b"ping"),
        }
    }

    #[test]
    fn test_warnings() {
        assert!(!Correlation::Untracked.is_warning());
        assert!(Correlation::Unroutable.is_warning());
        assert!(!Correlation::Sent { handle: handle() }.is_warning());
        assert!(Correlation::Unmatched {
            route: Route::new("1", "2"),
            key: ContentHash::from_bytes(b"ping"),
        }
        .is_warning());
    }

    #[test]
    fn test_send_index() {
        let matched = Correlation::Matched {
            handle: handle(),
            send_index: 4,
        };
        assert_eq!(matched.send_index(), Some(4));
        assert_eq!(Correlation::Sent { handle: handle() }.send_index(), None);
    }

    #[test]
    fn test_progress() {
        let report = StepReport {
            event: Event::new(EventKind::NodeCrashed, serde_json::Map::new(), 2),
            correlation: Correlation::Untracked,
            position: 3,
            total: 10,
        };
        assert_eq!(report.progress(), "Event: #3/10");
        assert!(!report.is_last());
    }
}
