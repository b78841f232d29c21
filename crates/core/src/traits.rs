//! The renderer seam.

use crate::Correlation;
use vdebug_types::{Event, Test};

/// Consumer of replay steps.
///
/// The session calls into a renderer synchronously, once per state change.
/// A GUI would animate the event on its topology diagram; the terminal front
/// end prints it.
///
/// # Example
///
/// ```ignore
/// struct Counter(usize);
///
/// impl Renderer for Counter {
///     fn on_test_selected(&mut self, _test: &Test) {
///         self.0 = 0;
///     }
///
///     fn on_test_reset(&mut self) {
///         self.0 = 0;
///     }
///
///     fn on_event(&mut self, _event: &Event, _correlation: &Correlation) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait Renderer {
    /// A test was selected; all previous drawing state is stale.
    fn on_test_selected(&mut self, test: &Test);

    /// The selected test was rewound to its first event.
    fn on_test_reset(&mut self);

    /// An event was applied.
    ///
    /// `correlation` tells a renderer which earlier send a receive belongs to,
    /// so it can retire the in-flight message it drew for that send.
    fn on_event(&mut self, event: &Event, correlation: &Correlation);

    /// The most recently applied event was undone by stepping backwards.
    fn on_event_reverted(&mut self, _event: &Event) {}
}

/// Renderer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn on_test_selected(&mut self, _test: &Test) {}

    fn on_test_reset(&mut self) {}

    fn on_event(&mut self, _event: &Event, _correlation: &Correlation) {}
}
