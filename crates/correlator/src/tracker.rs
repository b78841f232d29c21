//! Pending-send tracker.

use crate::CorrelationError;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tracing::debug;
use vdebug_types::{ContentHash, PendingSendHandle, Route, SendId};

/// Tracks sends that have not been received yet.
///
/// Sends are queued per `(route, content hash)`; a receive consumes the
/// oldest send in its queue. Every send gets a fresh [`SendId`], so two
/// identical messages on the same route stay distinguishable and are matched
/// in the order they were sent.
///
/// Both operations can be undone in reverse order with
/// [`cancel_send`](Self::cancel_send) and
/// [`restore_receive`](Self::restore_receive), which brings the tracker back
/// to exactly the state it had before.
#[derive(Debug)]
pub struct MessageCorrelator {
    /// (route, key) -> pending handles, oldest first.
    pending: HashMap<(Route, ContentHash), VecDeque<PendingSendHandle>>,

    /// Id the next recorded send gets.
    next_id: SendId,

    /// Total number of pending handles across all queues.
    len: usize,
}

impl Default for MessageCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCorrelator {
    /// Create a new empty correlator.
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_id: SendId(0),
            len: 0,
        }
    }

    /// Correlation key of a message body.
    pub fn key_of(content: &Value) -> ContentHash {
        ContentHash::of_json(content)
    }

    /// Record a send of `content` from `src` to `dst`.
    pub fn record_send(&mut self, src: &str, dst: &str, content: &Value) -> PendingSendHandle {
        let handle = PendingSendHandle {
            id: self.next_id,
            route: Route::new(src, dst),
            key: Self::key_of(content),
        };
        self.next_id = self.next_id.next();

        self.pending
            .entry((handle.route.clone(), handle.key))
            .or_default()
            .push_back(handle.clone());
        self.len += 1;

        debug!(%handle, pending = self.len, "Recorded send");
        handle
    }

    /// Match a receive of `content` on `src -> dst` against the oldest
    /// pending send with the same content.
    pub fn match_receive(
        &mut self,
        src: &str,
        dst: &str,
        content: &Value,
    ) -> Result<PendingSendHandle, CorrelationError> {
        let slot = (Route::new(src, dst), Self::key_of(content));

        // Queues are removed when they run empty.
        let Some(queue) = self.pending.get_mut(&slot) else {
            return Err(CorrelationError::UnmatchedReceive {
                src: src.to_string(),
                dst: dst.to_string(),
                key: slot.1,
            });
        };
        let Some(handle) = queue.pop_front() else {
            return Err(CorrelationError::UnmatchedReceive {
                src: src.to_string(),
                dst: dst.to_string(),
                key: slot.1,
            });
        };
        if queue.is_empty() {
            self.pending.remove(&slot);
        }
        self.len -= 1;

        debug!(%handle, pending = self.len, "Matched receive");
        Ok(handle)
    }

    /// Undo the most recent [`record_send`](Self::record_send) for `handle`.
    ///
    /// The handle must still be pending and be the newest in its queue.
    pub fn cancel_send(&mut self, handle: &PendingSendHandle) -> Result<(), CorrelationError> {
        let slot = (handle.route.clone(), handle.key);
        let queue = match self.pending.get_mut(&slot) {
            Some(queue) if queue.back() == Some(handle) => queue,
            _ => {
                return Err(CorrelationError::NotUndoable {
                    handle: handle.clone(),
                })
            }
        };

        queue.pop_back();
        if queue.is_empty() {
            self.pending.remove(&slot);
        }
        self.len -= 1;

        // Give the id back so a replay hands out the same ids again.
        if handle.id.next() == self.next_id {
            self.next_id = handle.id;
        }

        debug!(%handle, pending = self.len, "Cancelled send");
        Ok(())
    }

    /// Undo the [`match_receive`](Self::match_receive) that returned `handle`.
    ///
    /// Puts the handle back at the front of its queue. Fails if a handle
    /// older than it is already there.
    pub fn restore_receive(&mut self, handle: PendingSendHandle) -> Result<(), CorrelationError> {
        if handle.id >= self.next_id {
            return Err(CorrelationError::NotUndoable { handle });
        }

        let queue = self
            .pending
            .entry((handle.route.clone(), handle.key))
            .or_default();
        if let Some(front) = queue.front() {
            if front.id <= handle.id {
                return Err(CorrelationError::NotUndoable { handle });
            }
        }

        debug!(%handle, pending = self.len + 1, "Restored receive");
        queue.push_front(handle);
        self.len += 1;
        Ok(())
    }

    /// Drop all pending sends and restart id allocation.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.next_id = SendId(0);
        self.len = 0;
    }

    /// Number of pending sends on `src -> dst`, any content.
    pub fn pending_for(&self, src: &str, dst: &str) -> usize {
        self.pending
            .iter()
            .filter(|((route, _), _)| route.src == src && route.dst == dst)
            .map(|(_, queue)| queue.len())
            .sum()
    }

    /// Get the number of pending sends.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no send is pending.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn ping() -> Value {
        json!({"type": "Ping", "data": {}})
    }

    #[test]
    fn test_send_then_receive() {
        let mut correlator = MessageCorrelator::new();

        let sent = correlator.record_send("1", "2", &ping());
        assert_eq!(correlator.len(), 1);
        assert_eq!(correlator.pending_for("1", "2"), 1);

        let matched = correlator.match_receive("1", "2", &ping()).unwrap();
        assert_eq!(matched, sent);
        assert!(correlator.is_empty());
    }

    #[test]
    fn test_second_receive_is_unmatched() {
        let mut correlator = MessageCorrelator::new();
        correlator.record_send("1", "2", &ping());
        correlator.match_receive("1", "2", &ping()).unwrap();

        let err = correlator.match_receive("1", "2", &ping()).unwrap_err();
        assert_eq!(
            err,
            CorrelationError::UnmatchedReceive {
                src: "1".to_string(),
                dst: "2".to_string(),
                key: MessageCorrelator::key_of(&ping()),
            }
        );
    }

    #[test]
    fn test_identical_sends_match_in_order() {
        let mut correlator = MessageCorrelator::new();
        let first = correlator.record_send("1", "2", &ping());
        let second = correlator.record_send("1", "2", &ping());
        assert_ne!(first.id, second.id);

        assert_eq!(correlator.match_receive("1", "2", &ping()).unwrap(), first);
        assert_eq!(correlator.match_receive("1", "2", &ping()).unwrap(), second);
    }

    #[test]
    fn test_route_and_content_scope_the_match() {
        let mut correlator = MessageCorrelator::new();
        correlator.record_send("1", "2", &ping());

        // Wrong direction.
        assert!(correlator.match_receive("2", "1", &ping()).is_err());
        // Different content.
        let pong = json!({"type": "Pong", "data": {}});
        assert!(correlator.match_receive("1", "2", &pong).is_err());
        // Same type, different data.
        let ping_seq = json!({"type": "Ping", "data": {"seq": 1}});
        assert!(correlator.match_receive("1", "2", &ping_seq).is_err());

        assert_eq!(correlator.len(), 1);
    }

    #[test]
    fn test_key_ignores_object_key_order() {
        let a = json!({"type": "Vote", "data": {"round": 1, "block": "abc"}});
        let b: Value =
            serde_json::from_str(r#"{"data":{"block":"abc","round":1},"type":"Vote"}"#).unwrap();
        assert_eq!(MessageCorrelator::key_of(&a), MessageCorrelator::key_of(&b));
    }

    #[test]
    fn test_cancel_send() {
        let mut correlator = MessageCorrelator::new();
        let first = correlator.record_send("1", "2", &ping());
        let second = correlator.record_send("1", "2", &ping());

        // Only the newest send of a queue can be cancelled.
        assert!(matches!(
            correlator.cancel_send(&first),
            Err(CorrelationError::NotUndoable { .. })
        ));

        correlator.cancel_send(&second).unwrap();
        assert_eq!(correlator.len(), 1);

        // The freed id is handed out again.
        let again = correlator.record_send("1", "2", &ping());
        assert_eq!(again, second);
    }

    #[test]
    fn test_restore_receive() {
        let mut correlator = MessageCorrelator::new();
        let first = correlator.record_send("1", "2", &ping());
        let second = correlator.record_send("1", "2", &ping());

        let matched = correlator.match_receive("1", "2", &ping()).unwrap();
        assert_eq!(matched, first);

        correlator.restore_receive(matched).unwrap();
        assert_eq!(correlator.len(), 2);

        // Order is back to what it was: first is matched first again.
        assert_eq!(correlator.match_receive("1", "2", &ping()).unwrap(), first);
        assert_eq!(correlator.match_receive("1", "2", &ping()).unwrap(), second);
    }

    #[test]
    fn test_restore_out_of_order_is_rejected() {
        let mut correlator = MessageCorrelator::new();
        let first = correlator.record_send("1", "2", &ping());
        correlator.record_send("1", "2", &ping());

        // `first` is still pending at the front; restoring it again would
        // duplicate it.
        assert!(matches!(
            correlator.restore_receive(first),
            Err(CorrelationError::NotUndoable { .. })
        ));

        // A handle this correlator never issued.
        let foreign = PendingSendHandle {
            id: SendId(99),
            route: Route::new("1", "2"),
            key: MessageCorrelator::key_of(&ping()),
        };
        assert!(correlator.restore_receive(foreign).is_err());
        assert_eq!(correlator.len(), 2);
    }

    #[test]
    fn test_undo_in_reverse_restores_state() {
        let mut correlator = MessageCorrelator::new();
        let a = correlator.record_send("1", "2", &ping());
        let b = correlator.record_send("2", "1", &ping());
        let got_a = correlator.match_receive("1", "2", &ping()).unwrap();

        correlator.restore_receive(got_a).unwrap();
        correlator.cancel_send(&b).unwrap();
        correlator.cancel_send(&a).unwrap();

        assert!(correlator.is_empty());
        assert_eq!(correlator.record_send("1", "2", &ping()), a);
    }

    #[test]
    fn test_clear() {
        let mut correlator = MessageCorrelator::new();
        correlator.record_send("1", "2", &ping());
        correlator.record_send("1", "3", &ping());
        assert_eq!(correlator.len(), 2);

        correlator.clear();
        assert!(correlator.is_empty());
        assert_eq!(correlator.pending_for("1", "2"), 0);
        assert_eq!(correlator.record_send("1", "2", &ping()).id, SendId(0));
    }

    #[test]
    #[traced_test]
    fn test_logs_matches() {
        let mut correlator = MessageCorrelator::new();
        correlator.record_send("1", "2", &ping());
        correlator.match_receive("1", "2", &ping()).unwrap();

        assert!(logs_contain("Recorded send"));
        assert!(logs_contain("Matched receive"));
    }
}
