//! Trace events.

use crate::{EventData, Route};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Category of a trace event.
///
/// This is a closed set: a log line carrying any other `type` is rejected by
/// the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    // ═══════════════════════════════════════════════════════════════════════
    // Messages
    // ═══════════════════════════════════════════════════════════════════════
    /// A node sent a message to another node.
    MessageSend,

    /// A node received a message from another node.
    MessageReceive,

    /// A node sent a message to its local user.
    LocalMessageSend,

    /// A node received a message from its local user.
    LocalMessageReceive,

    /// The network dropped a message.
    MessageDropped,

    /// A message was discarded on arrival (e.g. the destination was down).
    MessageDiscarded,

    // ═══════════════════════════════════════════════════════════════════════
    // Timers
    // ═══════════════════════════════════════════════════════════════════════
    /// A node armed a timer.
    TimerSet,

    /// A timer fired on a node.
    TimerFired,

    // ═══════════════════════════════════════════════════════════════════════
    // Node lifecycle
    // ═══════════════════════════════════════════════════════════════════════
    /// A crashed node came back with its state intact.
    NodeRecovered,

    /// A node was restarted from scratch.
    NodeRestarted,

    /// A node crashed.
    NodeCrashed,

    /// A node joined the network.
    NodeConnected,

    /// A node left the network.
    NodeDisconnected,

    // ═══════════════════════════════════════════════════════════════════════
    // Network
    // ═══════════════════════════════════════════════════════════════════════
    /// A directed link was re-enabled.
    LinkEnabled,

    /// A directed link was disabled.
    LinkDisabled,

    /// The network was split into two groups.
    NetworkPartition,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 16] = [
        EventKind::MessageSend,
        EventKind::MessageReceive,
        EventKind::LocalMessageSend,
        EventKind::LocalMessageReceive,
        EventKind::MessageDropped,
        EventKind::MessageDiscarded,
        EventKind::TimerSet,
        EventKind::TimerFired,
        EventKind::NodeRecovered,
        EventKind::NodeRestarted,
        EventKind::NodeCrashed,
        EventKind::NodeConnected,
        EventKind::NodeDisconnected,
        EventKind::LinkEnabled,
        EventKind::LinkDisabled,
        EventKind::NetworkPartition,
    ];

    /// The name used for this kind in the log format.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MessageSend => "MessageSend",
            EventKind::MessageReceive => "MessageReceive",
            EventKind::LocalMessageSend => "LocalMessageSend",
            EventKind::LocalMessageReceive => "LocalMessageReceive",
            EventKind::MessageDropped => "MessageDropped",
            EventKind::MessageDiscarded => "MessageDiscarded",
            EventKind::TimerSet => "TimerSet",
            EventKind::TimerFired => "TimerFired",
            EventKind::NodeRecovered => "NodeRecovered",
            EventKind::NodeRestarted => "NodeRestarted",
            EventKind::NodeCrashed => "NodeCrashed",
            EventKind::NodeConnected => "NodeConnected",
            EventKind::NodeDisconnected => "NodeDisconnected",
            EventKind::LinkEnabled => "LinkEnabled",
            EventKind::LinkDisabled => "LinkDisabled",
            EventKind::NetworkPartition => "NetworkPartition",
        }
    }

    /// Check if this kind travels between two nodes (`src` and `dst` present).
    pub fn is_network_message(&self) -> bool {
        matches!(
            self,
            EventKind::MessageSend
                | EventKind::MessageReceive
                | EventKind::MessageDropped
                | EventKind::MessageDiscarded
        )
    }

    /// Check if this kind is exchanged with a node's local user.
    pub fn is_local_message(&self) -> bool {
        matches!(
            self,
            EventKind::LocalMessageSend | EventKind::LocalMessageReceive
        )
    }

    /// Check if this kind describes a single node changing state.
    pub fn is_node_lifecycle(&self) -> bool {
        matches!(
            self,
            EventKind::NodeRecovered
                | EventKind::NodeRestarted
                | EventKind::NodeCrashed
                | EventKind::NodeConnected
                | EventKind::NodeDisconnected
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type: {0:?}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// One event of a test trace.
///
/// `data` is kept schema-less: renderers look at [`Event::kind`] to know which
/// fields to expect. The accessors below cover the fields the simulation
/// library writes by convention and return `None` when a field is absent or
/// has an unexpected shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Event category.
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Event payload.
    pub data: EventData,

    /// Zero-based position within the owning test.
    #[serde(skip)]
    pub index: usize,
}

impl Event {
    /// Create a new event.
    pub fn new(kind: EventKind, data: EventData, index: usize) -> Self {
        Self { kind, data, index }
    }

    /// Simulation timestamp (`data.ts`).
    pub fn timestamp(&self) -> Option<f64> {
        self.data.get("ts").and_then(Value::as_f64)
    }

    /// Source and destination of a network message or link change.
    pub fn route(&self) -> Option<Route> {
        if !(self.kind.is_network_message()
            || matches!(self.kind, EventKind::LinkEnabled | EventKind::LinkDisabled))
        {
            return None;
        }
        let src = self.str_field("src")?;
        let dst = self.str_field("dst")?;
        Some(Route::new(src, dst))
    }

    /// Destination node of a local message.
    pub fn local_node(&self) -> Option<&str> {
        if self.kind.is_local_message() {
            self.str_field("dst")
        } else {
            None
        }
    }

    /// Message body (`data.msg`, an object of the form `{type, data}`).
    pub fn message(&self) -> Option<&Value> {
        if self.kind.is_network_message() || self.kind.is_local_message() {
            self.data.get("msg")
        } else {
            None
        }
    }

    /// Message type name (`data.msg.type`).
    pub fn message_type(&self) -> Option<&str> {
        self.message()?.get("type")?.as_str()
    }

    /// Node affected by a lifecycle event or a timer firing.
    pub fn node(&self) -> Option<&str> {
        if self.kind.is_node_lifecycle() || self.kind == EventKind::TimerFired {
            self.str_field("node")
        } else {
            None
        }
    }

    /// Timer name of a timer event.
    pub fn timer_name(&self) -> Option<&str> {
        match self.kind {
            EventKind::TimerSet | EventKind::TimerFired => self.str_field("name"),
            _ => None,
        }
    }

    /// Serialize back to the `{type, data}` line format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.index, self.to_json())
    }
}
