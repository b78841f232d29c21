//! Replay errors.

use thiserror::Error;
use vdebug_correlator::CorrelationError;

/// Errors from moving a [`TestDebugCursor`](crate::TestDebugCursor).
///
/// Neither is fatal; they tell the caller it hit an end of the test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// Every event has been applied.
    #[error("end of test reached ({len} events)")]
    Exhausted {
        /// Number of events in the test.
        len: usize,
    },

    /// No event has been applied yet.
    #[error("already at the first event")]
    AtStart,
}

/// Errors from the [`Debugger`](crate::Debugger) session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DebuggerError {
    /// A step was asked for before any test was selected.
    #[error("no test selected")]
    NoTestSelected,

    /// The log holds no test with this name.
    #[error("unknown test: {0}")]
    UnknownTest(String),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Correlation(#[from] CorrelationError),
}

impl DebuggerError {
    /// Check if this is the end-of-test signal rather than a real failure.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, DebuggerError::Cursor(CursorError::Exhausted { .. }))
    }
}
