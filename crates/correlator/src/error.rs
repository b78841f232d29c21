//! Correlation errors.

use thiserror::Error;
use vdebug_types::{ContentHash, PendingSendHandle};

/// Errors from [`MessageCorrelator`](crate::MessageCorrelator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    /// A receive arrived with no pending send for its route and content.
    #[error("unmatched receive {src} --> {dst} (key {})", .key.short())]
    UnmatchedReceive {
        /// Sending node.
        src: String,
        /// Receiving node.
        dst: String,
        /// Content hash of the received message.
        key: ContentHash,
    },

    /// An undo was asked for a handle that is not where the undo expects it.
    #[error("cannot undo {handle}")]
    NotUndoable {
        /// The handle given to the undo.
        handle: PendingSendHandle,
    },
}
