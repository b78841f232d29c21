//! Streaming log parser.

use crate::{ParseError, NODE_IDS_MARKER, TEST_BEGIN_MARKER, TEST_END_MARKER};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vdebug_types::{Event, EventKind, SessionData, Test, TestStatus};

/// Raw shape of an event line before the type is checked.
#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    data: Value,
}

/// Incremental parser over log lines.
///
/// Feed lines in order with [`feed_line`](Self::feed_line), then call
/// [`finish`](Self::finish). Nothing is buffered beyond the tests themselves,
/// so the input can be streamed from any reader.
///
/// # Example
///
/// ```ignore
/// let mut parser = LogParser::new();
/// for line in reader.lines() {
///     parser.feed_line(&line?)?;
/// }
/// let session = parser.finish()?;
/// ```
#[derive(Debug, Default)]
pub struct LogParser {
    /// Tests in log order.
    tests: IndexMap<String, Test>,

    /// Node ids from the most recent `NODE_IDS` line.
    node_ids: BTreeSet<String>,

    /// Test currently receiving events (between BEGIN and END).
    current: Option<String>,

    /// Index the next event of the current test gets.
    event_counter: usize,

    /// Number of lines consumed so far.
    line_no: usize,
}

impl LogParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Consume one line (with or without its trailing newline).
    pub fn feed_line(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        if line.starts_with(NODE_IDS_MARKER) {
            self.on_node_ids(line);
        } else if line.starts_with(TEST_BEGIN_MARKER) {
            self.on_test_begin(line)?;
        } else if line.starts_with(TEST_END_MARKER) {
            self.on_test_end(line)?;
        } else {
            self.on_event(line)?;
        }
        Ok(())
    }

    /// Finish parsing and hand over the session.
    ///
    /// Fails with [`ParseError::EmptyLog`] when no test or no node id was seen.
    pub fn finish(self) -> Result<SessionData, ParseError> {
        if self.tests.is_empty() || self.node_ids.is_empty() {
            return Err(ParseError::EmptyLog {
                tests: self.tests.len(),
                node_ids: self.node_ids.len(),
            });
        }

        if let Some(name) = &self.current {
            warn!(test = %name, "log ended before TEST_END; test left unfinished");
        }

        let tests: IndexMap<String, Arc<Test>> = self
            .tests
            .into_iter()
            .map(|(name, test)| (name, Arc::new(test)))
            .collect();

        let session = SessionData::new(tests, self.node_ids);
        info!(
            tests = session.len(),
            nodes = session.node_ids.len(),
            events = session.total_events(),
            lines = self.line_no,
            "Parsed log"
        );
        Ok(session)
    }

    fn on_node_ids(&mut self, line: &str) {
        // Everything after the first colon; a later NODE_IDS line replaces the set.
        self.node_ids = line
            .split(':')
            .skip(1)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        debug!(count = self.node_ids.len(), "Node ids");
    }

    fn on_test_begin(&mut self, line: &str) -> Result<(), ParseError> {
        let name = match line.split_once(':') {
            Some((_, name)) if !name.is_empty() => name,
            _ => return Err(self.malformed("TEST_BEGIN without a test name")),
        };

        if let Some(previous) = &self.current {
            warn!(test = %previous, "TEST_BEGIN before TEST_END; test left unfinished");
        }
        if self.tests.contains_key(name) {
            warn!(test = %name, "Duplicate test name; replacing earlier test");
        }

        self.tests.insert(name.to_string(), Test::new(name));
        self.current = Some(name.to_string());
        self.event_counter = 0;
        debug!(test = %name, "Test begin");
        Ok(())
    }

    fn on_test_end(&mut self, line: &str) -> Result<(), ParseError> {
        let mut parts = line.splitn(3, ':');
        parts.next();
        let status = parts
            .next()
            .ok_or_else(|| self.malformed("TEST_END without a status"))?;
        let status: TestStatus = status
            .parse()
            .map_err(|e| self.malformed(format!("{}", e)))?;
        let error = parts
            .next()
            .filter(|err| !err.is_empty())
            .map(str::to_string);

        let name = self
            .current
            .take()
            .ok_or_else(|| self.malformed("TEST_END outside of a test"))?;
        if let Some(test) = self.tests.get_mut(&name) {
            test.status = Some(status);
            test.error = error;
            debug!(test = %name, %status, events = test.len(), "Test end");
        }
        self.event_counter = 0;
        Ok(())
    }

    fn on_event(&mut self, line: &str) -> Result<(), ParseError> {
        let Some(name) = self.current.as_ref() else {
            return Err(self.malformed("event outside of a test"));
        };

        let raw: RawEvent = serde_json::from_str(line)
            .map_err(|e| self.malformed(format!("bad event JSON: {}", e)))?;
        let kind: EventKind = raw.kind.parse().map_err(|_| ParseError::UnknownEventType {
            line: self.line_no,
            value: raw.kind.clone(),
        })?;
        let Value::Object(data) = raw.data else {
            return Err(self.malformed("event data is not an object"));
        };

        let index = self.event_counter;
        if let Some(test) = self.tests.get_mut(name) {
            test.events.push(Event::new(kind, data, index));
        }
        self.event_counter += 1;
        Ok(())
    }

    fn malformed(&self, reason: impl Into<String>) -> ParseError {
        ParseError::Malformed {
            line: self.line_no,
            reason: reason.into(),
        }
    }
}

/// Parse a log from any buffered reader, line by line.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<SessionData, ParseError> {
    let mut parser = LogParser::new();
    for line in reader.lines() {
        parser.feed_line(&line?)?;
    }
    parser.finish()
}

/// Parse a log held in memory.
pub fn parse_str(contents: &str) -> Result<SessionData, ParseError> {
    let mut parser = LogParser::new();
    for line in contents.lines() {
        parser.feed_line(line)?;
    }
    parser.finish()
}

/// Parse a log file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<SessionData, ParseError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Opening log");
    let file = File::open(path)?;
    parse_reader(BufReader::new(file))
}
