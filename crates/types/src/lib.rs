//! Core types for the trace debugger.
//!
//! Everything here is plain data shared by the parser, the correlator and the
//! replay session:
//!
//! - [`Event`] / [`EventKind`]: one record of a test trace
//! - [`Test`] / [`SessionData`]: the parsed contents of one log file
//! - [`ContentHash`]: BLAKE3 digest of a message body, used as a correlation key
//! - [`Route`], [`SendId`], [`PendingSendHandle`]: identifiers for in-flight messages
//! - [`layout`]: node placement for renderers

mod event;
mod hash;
mod identifiers;
pub mod layout;
mod session;

pub use event::{Event, EventKind, UnknownEventKind};
pub use hash::ContentHash;
pub use identifiers::{PendingSendHandle, Route, SendId};
pub use layout::{compute_positions, LayoutError, NodeLayout, NodePosition, Viewport};
pub use session::{SessionData, Test, TestStatus, UnknownTestStatus};

/// Payload of an event: a schema-less JSON object.
pub type EventData = serde_json::Map<String, serde_json::Value>;
