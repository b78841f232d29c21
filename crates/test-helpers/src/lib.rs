//! Test helpers for vdebug.
//!
//! Builds trace logs as text, so tests exercise the real parser instead of
//! hand-assembling sessions.

use serde_json::{json, Value};
use vdebug_types::EventKind;

/// The smallest useful log: one passing test with a single Ping exchange.
pub const PING_LOG: &str = concat!(
    "NODE_IDS:1:2\n",
    "TEST_BEGIN:t1\n",
    r#"{"type":"MessageSend","data":{"ts":0.1,"src":"1","dst":"2","msg":{"type":"Ping","data":{}}}}"#,
    "\n",
    r#"{"type":"MessageReceive","data":{"ts":0.2,"src":"1","dst":"2","msg":{"type":"Ping","data":{}}}}"#,
    "\n",
    "TEST_END:PASSED:\n",
);

/// Line-by-line log builder.
///
/// Every method appends exactly one line, so line numbers in parser errors
/// can be predicted from the call sequence.
#[derive(Debug, Default, Clone)]
pub struct LogBuilder {
    lines: Vec<String>,
}

impl LogBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Two nodes, two tests.
    ///
    /// `ping_pong` passes: 1 pings 2 twice, 2 pongs each ping.
    /// `lost_pong` fails: the second pong is dropped and node 2 crashes.
    pub fn ping_pong() -> String {
        Self::new()
            .node_ids(&["1", "2"])
            .begin("ping_pong")
            .send("1", "2", "Ping", 0.1)
            .send("1", "2", "Ping", 0.2)
            .receive("1", "2", "Ping", 0.3)
            .send("2", "1", "Pong", 0.4)
            .receive("1", "2", "Ping", 0.5)
            .send("2", "1", "Pong", 0.6)
            .receive("2", "1", "Pong", 0.7)
            .receive("2", "1", "Pong", 0.8)
            .end_passed()
            .begin("lost_pong")
            .send("1", "2", "Ping", 0.1)
            .receive("1", "2", "Ping", 0.2)
            .send("2", "1", "Pong", 0.3)
            .dropped("2", "1", "Pong", 0.4)
            .crash("2", 0.5)
            .timer_fired("1", "retry", 1.0)
            .end_failed("no pong from node 2")
            .build()
    }

    /// Append a `NODE_IDS` line.
    pub fn node_ids(mut self, ids: &[&str]) -> Self {
        let mut line = String::from("NODE_IDS");
        for id in ids {
            line.push(':');
            line.push_str(id);
        }
        self.lines.push(line);
        self
    }

    /// Append a `TEST_BEGIN` line.
    pub fn begin(mut self, name: &str) -> Self {
        self.lines.push(format!("TEST_BEGIN:{}", name));
        self
    }

    /// Append `TEST_END:PASSED:`.
    pub fn end_passed(mut self) -> Self {
        self.lines.push("TEST_END:PASSED:".to_string());
        self
    }

    /// Append `TEST_END:FAILED:<error>`.
    pub fn end_failed(mut self, error: &str) -> Self {
        self.lines.push(format!("TEST_END:FAILED:{}", error));
        self
    }

    /// Append an event line with an arbitrary payload.
    pub fn event(mut self, kind: EventKind, data: Value) -> Self {
        self.lines
            .push(json!({"type": kind.as_str(), "data": data}).to_string());
        self
    }

    /// Append a `MessageSend` with an empty message body.
    pub fn send(self, src: &str, dst: &str, msg_type: &str, ts: f64) -> Self {
        self.send_with(src, dst, message(msg_type, json!({})), ts)
    }

    /// Append a `MessageSend` carrying `msg`.
    pub fn send_with(self, src: &str, dst: &str, msg: Value, ts: f64) -> Self {
        self.network(EventKind::MessageSend, src, dst, msg, ts)
    }

    /// Append a `MessageReceive` with an empty message body.
    pub fn receive(self, src: &str, dst: &str, msg_type: &str, ts: f64) -> Self {
        self.receive_with(src, dst, message(msg_type, json!({})), ts)
    }

    /// Append a `MessageReceive` carrying `msg`.
    pub fn receive_with(self, src: &str, dst: &str, msg: Value, ts: f64) -> Self {
        self.network(EventKind::MessageReceive, src, dst, msg, ts)
    }

    /// Append a `MessageDropped` with an empty message body.
    pub fn dropped(self, src: &str, dst: &str, msg_type: &str, ts: f64) -> Self {
        self.network(
            EventKind::MessageDropped,
            src,
            dst,
            message(msg_type, json!({})),
            ts,
        )
    }

    /// Append a `NodeCrashed`.
    pub fn crash(self, node: &str, ts: f64) -> Self {
        self.event(EventKind::NodeCrashed, json!({"node": node, "ts": ts}))
    }

    /// Append a `TimerFired`.
    pub fn timer_fired(self, node: &str, name: &str, ts: f64) -> Self {
        self.event(
            EventKind::TimerFired,
            json!({"name": name, "node": node, "ts": ts}),
        )
    }

    /// Append a verbatim line.
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Render the log, one line per record with a trailing newline.
    pub fn build(self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn network(self, kind: EventKind, src: &str, dst: &str, msg: Value, ts: f64) -> Self {
        self.event(kind, json!({"ts": ts, "src": src, "dst": dst, "msg": msg}))
    }
}

/// A `{type, data}` message body.
pub fn message(msg_type: &str, data: Value) -> Value {
    json!({"type": msg_type, "data": data})
}
