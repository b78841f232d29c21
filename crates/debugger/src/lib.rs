//! vdebug terminal front end
//!
//! An interactive step-debugger for simulation trace logs, built on
//! `vdebug-replay`. It stands in for a graphical front end: the same
//! [`Renderer`](vdebug_core::Renderer) calls a GUI would animate are printed
//! as one line per event.
//!
//! # Example
//!
//! ```ignore
//! use vdebug_debugger::{Command, DebuggerConfig, Repl};
//! use vdebug_replay::Debugger;
//!
//! let session = vdebug_parser::parse_file("trace.log")?;
//! let mut repl = Repl::new(Debugger::new(session), std::io::stdout(), DebuggerConfig::default());
//!
//! repl.execute(Command::Select("t1".to_string()))?;
//! repl.execute(Command::Next)?;
//! ```

pub mod command;
pub mod config;
pub mod console;
pub mod interrupt;
pub mod repl;

pub use command::{Command, CommandError, HELP};
pub use config::DebuggerConfig;
pub use console::{caption, payload, ConsoleRenderer};
pub use repl::{Flow, Repl};
