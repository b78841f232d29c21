//! Core types for the trace debugger.
//!
//! The replay session talks to the outside world only through the
//! [`Renderer`] trait defined here, handing it one [`Event`] per step together
//! with the step's [`Correlation`]. Renderers never reach into the parser or
//! the correlator.
//!
//! [`Event`]: vdebug_types::Event

mod step;
mod traits;

pub use step::{Correlation, StepReport};
pub use traits::{NullRenderer, Renderer};
