//! Step-by-step trace replay.
//!
//! Given a parsed log, this crate walks one test at a time, event by event,
//! forwards and backwards, and tells a [`Renderer`] about every change.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Debugger                          │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     SessionData (IndexMap<name, Arc<Test>>)        │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ select_test                 │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     TestDebugCursor + MessageCorrelator            │ │
//! │  │     + step history (for exact undo)                │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ step_forward / step_back    │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Renderer::on_event(event, correlation)         │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`AutoPlay`] drives `step_forward` from a timer owned by the front end.
//!
//! [`Renderer`]: vdebug_core::Renderer

mod autoplay;
mod cursor;
mod debugger;
mod error;

pub use autoplay::{AutoPlay, Tick, DEFAULT_STEP_DELAY};
pub use cursor::TestDebugCursor;
pub use debugger::{Debugger, TestMenu};
pub use error::{CursorError, DebuggerError};
