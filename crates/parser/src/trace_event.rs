//! Typed trace events, as written by the simulation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vdebug_types::{Event, EventData, EventKind};

/// A message body: user-level type name plus arbitrary JSON data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonMessage {
    /// Message type name.
    #[serde(rename = "type")]
    pub kind: String,

    /// Message contents.
    pub data: Value,
}

impl JsonMessage {
    /// Create a new message.
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// One event as produced by the simulation.
///
/// Serializes to exactly the `{"type": ..., "data": {...}}` shape of a log
/// line. The debugger itself works on the schema-less [`Event`]; this enum is
/// for producers and for renderers that want typed access to a known payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TraceEvent {
    MessageSend {
        msg: JsonMessage,
        src: String,
        dst: String,
        ts: f64,
    },
    MessageReceive {
        msg: JsonMessage,
        src: String,
        dst: String,
        ts: f64,
    },
    LocalMessageSend {
        msg: JsonMessage,
        dst: String,
        ts: f64,
    },
    LocalMessageReceive {
        msg: JsonMessage,
        dst: String,
        ts: f64,
    },
    MessageDropped {
        msg: JsonMessage,
        src: String,
        dst: String,
        ts: f64,
    },
    MessageDiscarded {
        msg: JsonMessage,
        src: String,
        dst: String,
        ts: f64,
    },
    TimerSet {
        name: String,
        delay: f64,
        ts: f64,
    },
    TimerFired {
        name: String,
        node: String,
        ts: f64,
    },
    NodeRecovered {
        node: String,
        ts: f64,
    },
    NodeRestarted {
        node: String,
        ts: f64,
    },
    NodeCrashed {
        node: String,
        ts: f64,
    },
    NodeConnected {
        node: String,
        ts: f64,
    },
    NodeDisconnected {
        node: String,
        ts: f64,
    },
    LinkEnabled {
        src: String,
        dst: String,
        ts: f64,
    },
    LinkDisabled {
        src: String,
        dst: String,
        ts: f64,
    },
    NetworkPartition {
        group1: Vec<String>,
        group2: Vec<String>,
        ts: f64,
    },
}

impl TraceEvent {
    /// Category of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            TraceEvent::MessageSend { .. } => EventKind::MessageSend,
            TraceEvent::MessageReceive { .. } => EventKind::MessageReceive,
            TraceEvent::LocalMessageSend { .. } => EventKind::LocalMessageSend,
            TraceEvent::LocalMessageReceive { .. } => EventKind::LocalMessageReceive,
            TraceEvent::MessageDropped { .. } => EventKind::MessageDropped,
            TraceEvent::MessageDiscarded { .. } => EventKind::MessageDiscarded,
            TraceEvent::TimerSet { .. } => EventKind::TimerSet,
            TraceEvent::TimerFired { .. } => EventKind::TimerFired,
            TraceEvent::NodeRecovered { .. } => EventKind::NodeRecovered,
            TraceEvent::NodeRestarted { .. } => EventKind::NodeRestarted,
            TraceEvent::NodeCrashed { .. } => EventKind::NodeCrashed,
            TraceEvent::NodeConnected { .. } => EventKind::NodeConnected,
            TraceEvent::NodeDisconnected { .. } => EventKind::NodeDisconnected,
            TraceEvent::LinkEnabled { .. } => EventKind::LinkEnabled,
            TraceEvent::LinkDisabled { .. } => EventKind::LinkDisabled,
            TraceEvent::NetworkPartition { .. } => EventKind::NetworkPartition,
        }
    }

    /// Simulation timestamp.
    pub fn ts(&self) -> f64 {
        match self {
            TraceEvent::MessageSend { ts, .. }
            | TraceEvent::MessageReceive { ts, .. }
            | TraceEvent::LocalMessageSend { ts, .. }
            | TraceEvent::LocalMessageReceive { ts, .. }
            | TraceEvent::MessageDropped { ts, .. }
            | TraceEvent::MessageDiscarded { ts, .. }
            | TraceEvent::TimerSet { ts, .. }
            | TraceEvent::TimerFired { ts, .. }
            | TraceEvent::NodeRecovered { ts, .. }
            | TraceEvent::NodeRestarted { ts, .. }
            | TraceEvent::NodeCrashed { ts, .. }
            | TraceEvent::NodeConnected { ts, .. }
            | TraceEvent::NodeDisconnected { ts, .. }
            | TraceEvent::LinkEnabled { ts, .. }
            | TraceEvent::LinkDisabled { ts, .. }
            | TraceEvent::NetworkPartition { ts, .. } => *ts,
        }
    }

    /// Payload as a schema-less JSON object.
    pub fn to_data(&self) -> Result<EventData, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        match value.get_mut("data").map(Value::take) {
            Some(Value::Object(data)) => Ok(data),
            _ => Ok(EventData::new()),
        }
    }

    /// Typed view of a parsed event.
    ///
    /// Fails when the payload does not have the fields the simulation writes
    /// for that kind.
    pub fn from_event(event: &Event) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "type": event.kind.as_str(),
            "data": event.data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_shape() {
        let event = TraceEvent::NodeCrashed {
            node: "3".to_string(),
            ts: 1.5,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "NodeCrashed", "data": {"node": "3", "ts": 1.5}})
        );
    }

    #[test]
    fn test_message_payload() {
        let event = TraceEvent::MessageSend {
            msg: JsonMessage::new("Ping", json!({"seq": 1})),
            src: "1".to_string(),
            dst: "2".to_string(),
            ts: 0.25,
        };

        let data = event.to_data().unwrap();
        assert_eq!(data["msg"], json!({"type": "Ping", "data": {"seq": 1}}));
        assert_eq!(data["src"], "1");
        assert_eq!(event.kind(), EventKind::MessageSend);
        assert_eq!(event.ts(), 0.25);
    }

    #[test]
    fn test_kind_names_agree() {
        let event = TraceEvent::NetworkPartition {
            group1: vec!["1".to_string()],
            group2: vec!["2".to_string(), "3".to_string()],
            ts: 2.0,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.kind().as_str());
    }

    #[test]
    fn test_from_event() {
        let data = json!({"node": "2", "ts": 0.5});
        let Value::Object(data) = data else {
            unreachable!()
        };
        let event = Event::new(EventKind::NodeRecovered, data, 0);

        assert_eq!(
            TraceEvent::from_event(&event).unwrap(),
            TraceEvent::NodeRecovered {
                node: "2".to_string(),
                ts: 0.5
            }
        );
    }

    #[test]
    fn test_from_event_rejects_wrong_shape() {
        let event = Event::new(EventKind::NodeRecovered, EventData::new(), 0);
        assert!(TraceEvent::from_event(&event).is_err());
    }
}
