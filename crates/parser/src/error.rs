//! Error types for reading and writing logs.

use thiserror::Error;

/// Errors that abort loading a log.
///
/// Every variant is fatal: a log either loads completely or not at all.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A line does not fit the format (bad JSON, event outside a test, ...).
    #[error("line {line}: malformed log: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// An event line names a type outside the known set.
    #[error("line {line}: unknown event type {value:?}")]
    UnknownEventType {
        /// 1-based line number.
        line: usize,
        /// The offending `type` value.
        value: String,
    },

    /// The whole log was read but it holds no tests or no node ids.
    #[error("parsed empty data. Tests: {tests} Nodes: {node_ids}")]
    EmptyLog {
        /// Number of tests found.
        tests: usize,
        /// Number of node ids found.
        node_ids: usize,
    },

    /// Reading the input failed.
    #[error("failed to read log: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Line the error was found on, if it is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Malformed { line, .. } | ParseError::UnknownEventType { line, .. } => {
                Some(*line)
            }
            ParseError::EmptyLog { .. } | ParseError::Io(_) => None,
        }
    }
}

/// Errors while writing a log.
#[derive(Debug, Error)]
pub enum WriteError {
    /// A field would break the line format (embedded newline or separator).
    #[error("invalid {field}: {value:?}")]
    InvalidField {
        /// Which field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Event payload could not be encoded.
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to the sink failed.
    #[error("failed to write log: {0}")]
    Io(#[from] std::io::Error),
}
