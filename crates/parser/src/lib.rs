//! Reader and writer for the trace log format.
//!
//! # Log Format
//!
//! ```text
//! NODE_IDS:<id1>:<id2>:...:<idN>
//! TEST_BEGIN:<test_name>
//! {"type": "<EventKind>", "data": {...}}
//! ...
//! TEST_END:<PASSED|FAILED>:<error_or_empty>
//! ```
//!
//! One record per line. The simulation side writes it with [`LogWriter`];
//! the debugger reads it back with [`LogParser`] in a single forward pass.

mod error;
mod parser;
mod trace_event;
mod writer;

pub use error::{ParseError, WriteError};
pub use parser::{parse_file, parse_reader, parse_str, LogParser};
pub use trace_event::{JsonMessage, TraceEvent};
pub use writer::LogWriter;

/// Prefix of the node list line.
pub const NODE_IDS_MARKER: &str = "NODE_IDS";

/// Prefix of the line opening a test.
pub const TEST_BEGIN_MARKER: &str = "TEST_BEGIN";

/// Prefix of the line closing a test.
pub const TEST_END_MARKER: &str = "TEST_END";
