//! Plain-text renderer.

use serde_json::Value;
use std::fmt;
use std::io::Write;
use tracing::warn;
use vdebug_core::{Correlation, Renderer};
use vdebug_types::{Event, EventKind, Test};

/// One-line caption of an event, as shown in the event list.
///
/// Fields missing from the payload are shown as `?`.
pub fn caption(event: &Event) -> String {
    let ts = match event.timestamp() {
        Some(ts) => format!("{:.3}", ts),
        None => "?".to_string(),
    };
    let field = |name: &str| -> String {
        match event.data.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "?".to_string(),
        }
    };
    let msg_type = event.message_type().unwrap_or("?");
    let node = event.node().unwrap_or("?");
    let timer = event.timer_name().unwrap_or("?");

    match event.kind {
        EventKind::MessageSend => {
            format!("{} | {} --> {} | {}", ts, field("src"), field("dst"), msg_type)
        }
        EventKind::MessageReceive => {
            format!("{} | {} <-- {} | {}", ts, field("dst"), field("src"), msg_type)
        }
        EventKind::LocalMessageSend => {
            let local = event.local_node().unwrap_or("?");
            format!("{} | {} >>> local | {}", ts, local, msg_type)
        }
        EventKind::LocalMessageReceive => {
            let local = event.local_node().unwrap_or("?");
            format!("{} | {} <<< local | {}", ts, local, msg_type)
        }
        EventKind::MessageDropped => format!(
            "{} | {} --x {} | {} | message dropped",
            ts,
            field("src"),
            field("dst"),
            msg_type
        ),
        EventKind::MessageDiscarded => format!(
            "{} | {} --x {} | {} | message discarded",
            ts,
            field("src"),
            field("dst"),
            msg_type
        ),
        EventKind::TimerSet => format!("{} | timer {} set for {}", ts, timer, field("delay")),
        EventKind::TimerFired => format!("{} | {} !-- {}", ts, node, timer),
        EventKind::NodeRecovered => format!("{} | {} RECOVERED", ts, node),
        EventKind::NodeRestarted => format!("{} | {} RESTARTED", ts, node),
        EventKind::NodeCrashed => format!("{} | {} CRASHED!", ts, node),
        EventKind::NodeConnected => format!("{} | {} CONNECTED", ts, node),
        EventKind::NodeDisconnected => format!("{} | {} DISCONNECTED", ts, node),
        EventKind::LinkEnabled => {
            format!("{} | {} --> {} | LINK ENABLED", ts, field("src"), field("dst"))
        }
        EventKind::LinkDisabled => {
            format!("{} | {} --> {} | LINK DISABLED", ts, field("src"), field("dst"))
        }
        EventKind::NetworkPartition => format!(
            "{} | NETWORK PARTITION {} {}",
            ts,
            field("group1"),
            field("group2")
        ),
    }
}

/// Compact JSON of a message's `data`, or `None` when there is nothing to show.
pub fn payload(event: &Event) -> Option<String> {
    match event.message()?.get("data")? {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        data => Some(data.to_string()),
    }
}

/// Renderer that prints one line per replay step.
#[derive(Debug)]
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    /// Print to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// The underlying writer, for output that is not a replay step.
    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Hand back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{}", args) {
            warn!(error = %err, "Failed to write to console");
        }
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn on_test_selected(&mut self, test: &Test) {
        let status = test
            .status
            .map_or("UNFINISHED".to_string(), |status| status.to_string());
        self.line(format_args!(
            "=== {} ({} events, {}) ===",
            test.name,
            test.len(),
            status
        ));
    }

    fn on_test_reset(&mut self) {
        self.line(format_args!("--- reset ---"));
    }

    fn on_event(&mut self, event: &Event, correlation: &Correlation) {
        let note = match correlation {
            Correlation::Matched { send_index, .. } => format!("  (sent at #{})", send_index),
            Correlation::Unmatched { key, .. } => {
                format!("  (WARNING: no matching send, key {})", key.short())
            }
            Correlation::Unroutable => "  (WARNING: missing src/dst/msg)".to_string(),
            Correlation::Sent { .. } | Correlation::Untracked => String::new(),
        };
        let body = payload(event)
            .map(|data| format!(" {}", data))
            .unwrap_or_default();
        self.line(format_args!(
            "#{:<4} {}{}{}",
            event.index,
            caption(event),
            body,
            note
        ));
    }

    fn on_event_reverted(&mut self, event: &Event) {
        self.line(format_args!("#{:<4} undo: {}", event.index, caption(event)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vdebug_types::{ContentHash, PendingSendHandle, Route, SendId};

    fn event(kind: EventKind, data: Value) -> Event {
        let Value::Object(data) = data else {
            panic!("test payload must be an object")
        };
        Event::new(kind, data, 0)
    }

    #[test]
    fn test_message_captions() {
        let send = event(
            EventKind::MessageSend,
            json!({"ts": 0.1, "src": "1", "dst": "2", "msg": {"type": "Ping", "data": {}}}),
        );
        assert_eq!(caption(&send), "0.100 | 1 --> 2 | Ping");

        let receive = event(
            EventKind::MessageReceive,
            json!({"ts": 0.2, "src": "1", "dst": "2", "msg": {"type": "Ping", "data": {}}}),
        );
        assert_eq!(caption(&receive), "0.200 | 2 <-- 1 | Ping");
    }

    #[test]
    fn test_other_captions() {
        let crash = event(EventKind::NodeCrashed, json!({"ts": 1.0, "node": "3"}));
        assert_eq!(caption(&crash), "1.000 | 3 CRASHED!");

        let timer = event(
            EventKind::TimerFired,
            json!({"ts": 2.5, "node": "1", "name": "heartbeat"}),
        );
        assert_eq!(caption(&timer), "2.500 | 1 !-- heartbeat");

        let partition = event(
            EventKind::NetworkPartition,
            json!({"ts": 3.0, "group1": ["1"], "group2": ["2", "3"]}),
        );
        assert_eq!(
            caption(&partition),
            r#"3.000 | NETWORK PARTITION ["1"] ["2","3"]"#
        );
    }

    #[test]
    fn test_local_and_timer_captions() {
        let local = event(
            EventKind::LocalMessageReceive,
            json!({"ts": 0.5, "dst": "2", "msg": {"type": "Get", "data": {}}}),
        );
        assert_eq!(caption(&local), "0.500 | 2 <<< local | Get");

        let timer = event(
            EventKind::TimerSet,
            json!({"ts": 0.0, "node": "1", "name": "tick", "delay": 1.5}),
        );
        assert_eq!(caption(&timer), "0.000 | timer tick set for 1.5");

        let nameless = event(EventKind::TimerFired, json!({"ts": 0.0, "node": 7}));
        assert_eq!(caption(&nameless), "0.000 | ? !-- ?");
    }

    #[test]
    fn test_payload_follows_caption() {
        let vote = event(
            EventKind::MessageSend,
            json!({"ts": 0.1, "src": "1", "dst": "2", "msg": {"type": "Vote", "data": {"round": 3}}}),
        );
        assert_eq!(payload(&vote).as_deref(), Some(r#"{"round":3}"#));

        let ping = event(
            EventKind::MessageSend,
            json!({"ts": 0.1, "src": "1", "dst": "2", "msg": {"type": "Ping", "data": {}}}),
        );
        assert_eq!(payload(&ping), None);

        let crash = event(EventKind::NodeCrashed, json!({"node": "1"}));
        assert_eq!(payload(&crash), None);

        let sent = Correlation::Sent {
            handle: PendingSendHandle {
                id: SendId(0),
                route: Route::new("1", "2"),
                key: ContentHash::from_bytes(b"vote"),
            },
        };
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.on_event(&vote, &sent);
        renderer.on_event_reverted(&vote);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], r#"#0    0.100 | 1 --> 2 | Vote {"round":3}"#);
        assert_eq!(lines[1], "#0    undo: 0.100 | 1 --> 2 | Vote");
    }

    #[test]
    fn test_missing_fields() {
        let bare = event(EventKind::MessageSend, json!({}));
        assert_eq!(caption(&bare), "? | ? --> ? | ?");
    }

    #[test]
    fn test_renderer_output() {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        let receive = event(
            EventKind::MessageReceive,
            json!({"ts": 0.2, "src": "1", "dst": "2", "msg": {"type": "Ping", "data": {}}}),
        );

        renderer.on_test_reset();
        renderer.on_event(
            &receive,
            &Correlation::Unmatched {
                route: Route::new("1", "2"),
                key: ContentHash::from_bytes(b"ping"),
            },
        );
        renderer.on_event_reverted(&receive);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "--- reset ---");
        assert!(lines[1].starts_with("#0    0.200 | 2 <-- 1 | Ping  (WARNING: no matching send"));
        assert_eq!(lines[2], "#0    undo: 0.200 | 2 <-- 1 | Ping");
    }
}
