//! Position within one test.

use crate::CursorError;
use std::sync::Arc;
use vdebug_types::{Event, Test};

/// A pointer into one test's event list.
///
/// `position` counts the events applied so far and stays within
/// `0..=len`; `position == len` means the test is exhausted. Moving past
/// either end is reported as an error and leaves the position unchanged.
#[derive(Debug, Clone)]
pub struct TestDebugCursor {
    test: Arc<Test>,
    event_idx: usize,
}

impl TestDebugCursor {
    /// Create a cursor before the first event of `test`.
    pub fn new(test: Arc<Test>) -> Self {
        Self { test, event_idx: 0 }
    }

    /// The test being walked.
    pub fn test(&self) -> &Arc<Test> {
        &self.test
    }

    /// The event the next [`advance`](Self::advance) will return.
    pub fn current(&self) -> Result<&Event, CursorError> {
        self.test.events.get(self.event_idx).ok_or(CursorError::Exhausted {
            len: self.test.len(),
        })
    }

    /// Return the current event and move past it.
    pub fn advance(&mut self) -> Result<&Event, CursorError> {
        let len = self.test.len();
        if self.event_idx >= len {
            return Err(CursorError::Exhausted { len });
        }
        self.event_idx += 1;
        Ok(&self.test.events[self.event_idx - 1])
    }

    /// Step back over the last applied event and return it.
    pub fn retreat(&mut self) -> Result<&Event, CursorError> {
        if self.event_idx == 0 {
            return Err(CursorError::AtStart);
        }
        self.event_idx -= 1;
        Ok(&self.test.events[self.event_idx])
    }

    /// Go back before the first event.
    pub fn reset(&mut self) {
        self.event_idx = 0;
    }

    /// Number of events applied so far.
    pub fn position(&self) -> usize {
        self.event_idx
    }

    /// Number of events in the test.
    pub fn len(&self) -> usize {
        self.test.len()
    }

    /// Check if the test has no events.
    pub fn is_empty(&self) -> bool {
        self.test.is_empty()
    }

    /// Check if every event has been applied.
    pub fn is_exhausted(&self) -> bool {
        self.event_idx >= self.test.len()
    }

    /// Progress text, e.g. `"#3/10"`.
    pub fn progress(&self) -> String {
        format!("#{}/{}", self.event_idx, self.test.len())
    }
}
