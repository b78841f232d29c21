//! The replay session.

use crate::{CursorError, DebuggerError, TestDebugCursor};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vdebug_core::{Correlation, Renderer, StepReport};
use vdebug_correlator::MessageCorrelator;
use vdebug_types::{Event, EventKind, PendingSendHandle, SessionData, Test, TestStatus};

/// Tests of a session grouped for a selection menu.
///
/// Each group keeps log order.
#[derive(Debug, Default)]
pub struct TestMenu<'a> {
    /// Tests that ended with `PASSED`.
    pub passed: Vec<&'a Arc<Test>>,
    /// Tests that ended with `FAILED`.
    pub failed: Vec<&'a Arc<Test>>,
    /// Tests whose `TEST_END` never arrived.
    pub unfinished: Vec<&'a Arc<Test>>,
}

/// Replay state of the selected test.
#[derive(Debug)]
struct Replay {
    cursor: TestDebugCursor,
    correlator: MessageCorrelator,

    /// Correlation of every applied event; `history[i]` belongs to event `i`.
    history: Vec<Correlation>,
}

impl Replay {
    fn new(test: Arc<Test>) -> Self {
        Self {
            cursor: TestDebugCursor::new(test),
            correlator: MessageCorrelator::new(),
            history: Vec::new(),
        }
    }

    fn correlate(&mut self, event: &Event) -> Correlation {
        if !matches!(event.kind, EventKind::MessageSend | EventKind::MessageReceive) {
            return Correlation::Untracked;
        }
        let (Some(route), Some(msg)) = (event.route(), event.message()) else {
            warn!(index = event.index, kind = %event.kind, "Message without src/dst/msg");
            return Correlation::Unroutable;
        };

        if event.kind == EventKind::MessageSend {
            let handle = self.correlator.record_send(&route.src, &route.dst, msg);
            return Correlation::Sent { handle };
        }

        match self.correlator.match_receive(&route.src, &route.dst, msg) {
            Ok(handle) => match self.send_index_of(&handle) {
                Some(send_index) => Correlation::Matched { handle, send_index },
                None => {
                    // Every handle comes from a send in `history`.
                    warn!(%handle, "Matched a send that is not in the step history");
                    Correlation::Unmatched {
                        route,
                        key: handle.key,
                    }
                }
            },
            Err(err) => {
                warn!(index = event.index, error = %err, "Receive without a matching send");
                Correlation::Unmatched {
                    route,
                    key: MessageCorrelator::key_of(msg),
                }
            }
        }
    }

    fn send_index_of(&self, handle: &PendingSendHandle) -> Option<usize> {
        self.history
            .iter()
            .rposition(|c| matches!(c, Correlation::Sent { handle: sent } if sent == handle))
    }

    fn undo(&mut self, correlation: &Correlation) -> Result<(), DebuggerError> {
        match correlation {
            Correlation::Sent { handle } => self.correlator.cancel_send(handle)?,
            Correlation::Matched { handle, .. } => self.correlator.restore_receive(handle.clone())?,
            Correlation::Untracked | Correlation::Unroutable | Correlation::Unmatched { .. } => {}
        }
        Ok(())
    }
}

/// A debugging session over one parsed log.
///
/// Owns the parsed data and the replay state of at most one selected test.
/// Every state change is reported to the [`Renderer`] passed into the call.
///
/// # Example
///
/// ```ignore
/// let mut debugger = Debugger::new(parse_file(path)?);
/// debugger.select_test("t1", &mut renderer)?;
/// while let Ok(report) = debugger.step_forward(&mut renderer) {
///     println!("{}", report.progress());
/// }
/// ```
#[derive(Debug)]
pub struct Debugger {
    session: SessionData,
    replay: Option<Replay>,
}

impl Debugger {
    /// Create a session with no test selected.
    pub fn new(session: SessionData) -> Self {
        Self {
            session,
            replay: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Session data
    // ═══════════════════════════════════════════════════════════════════════

    /// All tests in log order.
    pub fn tests(&self) -> impl Iterator<Item = &Arc<Test>> {
        self.session.tests.values()
    }

    /// Tests grouped by outcome.
    pub fn tests_by_status(&self) -> TestMenu<'_> {
        let mut menu = TestMenu::default();
        for test in self.session.tests.values() {
            match test.status {
                Some(TestStatus::Passed) => menu.passed.push(test),
                Some(TestStatus::Failed) => menu.failed.push(test),
                None => menu.unfinished.push(test),
            }
        }
        menu
    }

    /// Node ids of the log.
    pub fn node_ids(&self) -> &BTreeSet<String> {
        &self.session.node_ids
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Selected test
    // ═══════════════════════════════════════════════════════════════════════

    /// Select a test by name, discarding the replay state of the previous one.
    pub fn select_test(
        &mut self,
        name: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<(), DebuggerError> {
        let test = self
            .session
            .test(name)
            .cloned()
            .ok_or_else(|| DebuggerError::UnknownTest(name.to_string()))?;

        info!(test = %test.name, events = test.len(), "Selected test");
        renderer.on_test_selected(&test);
        self.replay = Some(Replay::new(test));
        Ok(())
    }

    /// The selected test.
    pub fn selected(&self) -> Option<&Arc<Test>> {
        self.replay.as_ref().map(|replay| replay.cursor.test())
    }

    /// Cursor over the selected test.
    pub fn cursor(&self) -> Option<&TestDebugCursor> {
        self.replay.as_ref().map(|replay| &replay.cursor)
    }

    /// Correlator of the selected test, holding the sends still in flight.
    pub fn correlator(&self) -> Option<&MessageCorrelator> {
        self.replay.as_ref().map(|replay| &replay.correlator)
    }

    /// Check if the selected test has been played to the end.
    pub fn is_exhausted(&self) -> bool {
        self.replay
            .as_ref()
            .is_some_and(|replay| replay.cursor.is_exhausted())
    }

    /// Error message of the selected test, if it failed with one.
    pub fn current_error(&self) -> Result<Option<&str>, DebuggerError> {
        let replay = self.replay.as_ref().ok_or(DebuggerError::NoTestSelected)?;
        Ok(replay.cursor.test().error.as_deref())
    }

    /// Send/receive partner of an already-applied event.
    ///
    /// For a receive, the send it matched; for a send, the receive that
    /// consumed it so far. `None` for everything else.
    pub fn pair_of(&self, index: usize) -> Option<usize> {
        let history = &self.replay.as_ref()?.history;
        match history.get(index)? {
            Correlation::Matched { send_index, .. } => Some(*send_index),
            Correlation::Sent { handle } => history
                .iter()
                .enumerate()
                .skip(index + 1)
                .find(|(_, c)| {
                    matches!(c, Correlation::Matched { handle: matched, .. } if matched == handle)
                })
                .map(|(receive_index, _)| receive_index),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Stepping
    // ═══════════════════════════════════════════════════════════════════════

    /// Apply the next event of the selected test.
    pub fn step_forward(&mut self, renderer: &mut dyn Renderer) -> Result<StepReport, DebuggerError> {
        let replay = self.replay.as_mut().ok_or(DebuggerError::NoTestSelected)?;

        let event = replay.cursor.advance()?.clone();
        let correlation = replay.correlate(&event);
        replay.history.push(correlation.clone());

        debug!(index = event.index, kind = %event.kind, ?correlation, "Step forward");
        renderer.on_event(&event, &correlation);

        Ok(StepReport {
            event,
            correlation,
            position: replay.cursor.position(),
            total: replay.cursor.len(),
        })
    }

    /// Undo the last applied event.
    ///
    /// The correlator is put back to exactly the state it had before that
    /// event, so stepping forward again reproduces the same correlation.
    pub fn step_back(&mut self, renderer: &mut dyn Renderer) -> Result<Event, DebuggerError> {
        let replay = self.replay.as_mut().ok_or(DebuggerError::NoTestSelected)?;

        let Some(correlation) = replay.history.last().cloned() else {
            return Err(CursorError::AtStart.into());
        };
        replay.undo(&correlation)?;
        replay.history.pop();
        let event = replay.cursor.retreat()?.clone();

        debug!(index = event.index, kind = %event.kind, "Step back");
        renderer.on_event_reverted(&event);
        Ok(event)
    }

    /// Rewind the selected test to its first event.
    pub fn reset(&mut self, renderer: &mut dyn Renderer) -> Result<(), DebuggerError> {
        let replay = self.replay.as_mut().ok_or(DebuggerError::NoTestSelected)?;

        replay.cursor.reset();
        replay.correlator.clear();
        replay.history.clear();

        debug!(test = %replay.cursor.test().name, "Reset test");
        renderer.on_test_reset();
        Ok(())
    }

    /// Replay from the start up to `target` applied events.
    ///
    /// A target past the end stops at the end. Returns the new position.
    pub fn seek(&mut self, target: usize, renderer: &mut dyn Renderer) -> Result<usize, DebuggerError> {
        self.reset(renderer)?;
        for _ in 0..target {
            match self.step_forward(renderer) {
                Ok(_) => {}
                Err(err) if err.is_exhausted() => break,
                Err(err) => return Err(err),
            }
        }
        Ok(self.cursor().map_or(0, TestDebugCursor::position))
    }
}
