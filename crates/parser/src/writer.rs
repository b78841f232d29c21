//! Log writer, the simulation side of the format.

use crate::{TraceEvent, WriteError, NODE_IDS_MARKER, TEST_BEGIN_MARKER, TEST_END_MARKER};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;
use vdebug_types::{EventData, EventKind, TestStatus};

/// Writes the line format read by [`LogParser`](crate::LogParser).
///
/// The writer does not enforce record order; it only refuses values that
/// would not survive a round trip through the parser.
#[derive(Debug)]
pub struct LogWriter<W: Write> {
    sink: W,
    lines: usize,
}

impl LogWriter<BufWriter<File>> {
    /// Create (or truncate) a log file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Creating log");
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> LogWriter<W> {
    /// Wrap a sink.
    pub fn new(sink: W) -> Self {
        Self { sink, lines: 0 }
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Write the `NODE_IDS` line.
    pub fn node_ids<I, S>(&mut self, ids: I) -> Result<(), WriteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut line = String::from(NODE_IDS_MARKER);
        for id in ids {
            let id = id.as_ref();
            if id.is_empty() || id.contains(':') || has_line_break(id) {
                return Err(invalid("node id", id));
            }
            line.push(':');
            line.push_str(id);
        }
        self.write_line(&line)
    }

    /// Write a `TEST_BEGIN` line.
    pub fn begin_test(&mut self, name: &str) -> Result<(), WriteError> {
        if name.is_empty() || has_line_break(name) {
            return Err(invalid("test name", name));
        }
        self.write_line(&format!("{}:{}", TEST_BEGIN_MARKER, name))
    }

    /// Write one event line from a schema-less payload.
    pub fn event(&mut self, kind: EventKind, data: &EventData) -> Result<(), WriteError> {
        let line = serde_json::to_string(&serde_json::json!({
            "type": kind.as_str(),
            "data": Value::Object(data.clone()),
        }))?;
        self.write_line(&line)
    }

    /// Write one typed event line.
    pub fn trace_event(&mut self, event: &TraceEvent) -> Result<(), WriteError> {
        let line = serde_json::to_string(event)?;
        self.write_line(&line)
    }

    /// Write a `TEST_END` line. The error text may contain colons.
    pub fn end_test(&mut self, status: TestStatus, error: Option<&str>) -> Result<(), WriteError> {
        let error = error.unwrap_or_default();
        if has_line_break(error) {
            return Err(invalid("test error", error));
        }
        self.write_line(&format!("{}:{}:{}", TEST_END_MARKER, status, error))
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        self.sink.flush()?;
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn into_inner(mut self) -> Result<W, WriteError> {
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn write_line(&mut self, line: &str) -> Result<(), WriteError> {
        self.sink.write_all(line.as_bytes())?;
        self.sink.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains('\n') || value.contains('\r')
}

fn invalid(field: &'static str, value: &str) -> WriteError {
    WriteError::InvalidField {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_str, JsonMessage};
    use serde_json::json;
    use vdebug_test_helpers::PING_LOG;

    fn written(f: impl FnOnce(&mut LogWriter<Vec<u8>>)) -> String {
        let mut writer = LogWriter::new(Vec::new());
        f(&mut writer);
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_writes_example_log() {
        let log = written(|w| {
            w.node_ids(["1", "2"]).unwrap();
            w.begin_test("t1").unwrap();
            for (kind, ts) in [(EventKind::MessageSend, 0.1), (EventKind::MessageReceive, 0.2)] {
                let Value::Object(data) = json!({
                    "ts": ts,
                    "src": "1",
                    "dst": "2",
                    "msg": {"type": "Ping", "data": {}},
                }) else {
                    unreachable!()
                };
                w.event(kind, &data).unwrap();
            }
            w.end_test(TestStatus::Passed, None).unwrap();
        });

        assert_eq!(parse_str(&log).unwrap(), parse_str(PING_LOG).unwrap());
    }

    #[test]
    fn test_typed_events() {
        let log = written(|w| {
            w.node_ids(["a", "b"]).unwrap();
            w.begin_test("typed").unwrap();
            w.trace_event(&TraceEvent::MessageSend {
                msg: JsonMessage::new("Vote", json!({"round": 3})),
                src: "a".to_string(),
                dst: "b".to_string(),
                ts: 1.0,
            })
            .unwrap();
            w.trace_event(&TraceEvent::NodeCrashed {
                node: "b".to_string(),
                ts: 2.0,
            })
            .unwrap();
            w.end_test(TestStatus::Failed, Some("stuck: no leader"))
                .unwrap();
        });

        let session = parse_str(&log).unwrap();
        let test = session.test("typed").unwrap();
        assert_eq!(test.len(), 2);
        assert_eq!(test.events[0].message_type(), Some("Vote"));
        assert_eq!(test.events[1].node(), Some("b"));
        assert_eq!(test.error.as_deref(), Some("stuck: no leader"));
    }

    #[test]
    fn test_counts_lines() {
        let mut writer = LogWriter::new(Vec::new());
        writer.node_ids(["1"]).unwrap();
        writer.begin_test("t1").unwrap();
        writer.end_test(TestStatus::Passed, None).unwrap();
        assert_eq!(writer.lines_written(), 3);
    }

    #[test]
    fn test_rejects_unparseable_fields() {
        let mut writer = LogWriter::new(Vec::new());

        assert!(matches!(
            writer.node_ids(["1", "2:3"]),
            Err(WriteError::InvalidField {
                field: "node id",
                ..
            })
        ));
        assert!(writer.node_ids([""]).is_err());
        assert!(writer.begin_test("two\nlines").is_err());
        assert!(writer.begin_test("").is_err());
        assert!(writer
            .end_test(TestStatus::Failed, Some("line one\nline two"))
            .is_err());
        assert_eq!(writer.lines_written(), 0);
    }
}
