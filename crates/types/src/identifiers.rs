//! Domain-specific identifier types.

use crate::ContentHash;
use std::fmt;

/// Directed pair of nodes a message travels over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route {
    /// Sending node.
    pub src: String,
    /// Receiving node.
    pub dst: String,
}

impl Route {
    /// Create a new route.
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.src, self.dst)
    }
}

/// Identifier of one recorded send occurrence.
///
/// Allocated from a per-correlator counter, so two sends with identical
/// content on the same route still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SendId(pub u64);

impl SendId {
    /// Get the next id.
    pub fn next(self) -> Self {
        SendId(self.0 + 1)
    }
}

impl fmt::Display for SendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Send({})", self.0)
    }
}

/// A send that is (or was) waiting for its receive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingSendHandle {
    /// Occurrence id.
    pub id: SendId,
    /// Route the message was sent over.
    pub route: Route,
    /// Content hash of the message body.
    pub key: ContentHash,
}

impl fmt::Display for PendingSendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] #{}", self.id, self.route, self.key.short())
    }
}
