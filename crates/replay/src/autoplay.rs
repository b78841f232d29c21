//! Timer-driven stepping.

use crate::{Debugger, DebuggerError};
use std::time::Duration;
use tracing::debug;
use vdebug_core::{Renderer, StepReport};

/// Delay between two auto-play steps.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(200);

/// Outcome of one auto-play tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// One event was applied.
    Stepped(StepReport),

    /// The test was already at its end; auto-play stopped itself.
    Finished,

    /// Auto-play is not running; nothing happened.
    Idle,
}

/// Auto-play policy: one step per period until the test ends or it is
/// stopped.
///
/// The timer itself belongs to the caller, which calls [`tick`](Self::tick)
/// once per period. Ticks take `&mut self`, so two of them can never run
/// at the same time.
#[derive(Debug, Clone)]
pub struct AutoPlay {
    period: Duration,
    running: bool,
}

impl Default for AutoPlay {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

impl AutoPlay {
    /// Create a stopped auto-play with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: false,
        }
    }

    /// Delay between two steps.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Check if auto-play is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start playing the selected test, from the top if it already ended.
    pub fn start(
        &mut self,
        debugger: &mut Debugger,
        renderer: &mut dyn Renderer,
    ) -> Result<(), DebuggerError> {
        if debugger.selected().is_none() {
            return Err(DebuggerError::NoTestSelected);
        }
        if debugger.is_exhausted() {
            debugger.reset(renderer)?;
        }
        self.running = true;
        debug!(period_ms = self.period.as_millis() as u64, "Auto-play started");
        Ok(())
    }

    /// Stop playing. Harmless when already stopped.
    pub fn stop(&mut self) {
        if self.running {
            debug!("Auto-play stopped");
        }
        self.running = false;
    }

    /// Apply exactly one step, if running.
    pub fn tick(
        &mut self,
        debugger: &mut Debugger,
        renderer: &mut dyn Renderer,
    ) -> Result<Tick, DebuggerError> {
        if !self.running {
            return Ok(Tick::Idle);
        }

        match debugger.step_forward(renderer) {
            Ok(report) => Ok(Tick::Stepped(report)),
            Err(err) if err.is_exhausted() => {
                self.stop();
                Ok(Tick::Finished)
            }
            Err(err) => {
                self.stop();
                Err(err)
            }
        }
    }
}
