//! Tests and sessions.

use crate::Event;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Outcome of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TestStatus {
    /// The test passed.
    Passed,
    /// The test failed.
    Failed,
}

impl TestStatus {
    /// The name used for this status in the log format.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`TestStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown test status: {0:?}")]
pub struct UnknownTestStatus(pub String);

impl FromStr for TestStatus {
    type Err = UnknownTestStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASSED" => Ok(TestStatus::Passed),
            "FAILED" => Ok(TestStatus::Failed),
            other => Err(UnknownTestStatus(other.to_string())),
        }
    }
}

/// One simulation run: its recorded trace plus outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Test {
    /// Unique test name.
    pub name: String,

    /// Events in log order; `events[i].index == i`.
    pub events: Vec<Event>,

    /// Outcome, or `None` when the log ended before `TEST_END`.
    pub status: Option<TestStatus>,

    /// Error reported by the test, if any.
    pub error: Option<String>,
}

impl Test {
    /// Create an empty test.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
            status: None,
            error: None,
        }
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the test recorded no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Check if the log contained the test's `TEST_END` line.
    pub fn is_finished(&self) -> bool {
        self.status.is_some()
    }
}

/// Everything loaded from one log file.
///
/// Tests are shared through `Arc` so a replay cursor can hold on to the test
/// it walks without borrowing the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionData {
    /// Tests keyed by name, in log order.
    pub tests: IndexMap<String, Arc<Test>>,

    /// Ids of every node in the topology.
    pub node_ids: BTreeSet<String>,
}

impl SessionData {
    /// Create a session from parts.
    pub fn new(tests: IndexMap<String, Arc<Test>>, node_ids: BTreeSet<String>) -> Self {
        Self { tests, node_ids }
    }

    /// Look up a test by name.
    pub fn test(&self, name: &str) -> Option<&Arc<Test>> {
        self.tests.get(name)
    }

    /// Number of tests.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Check if the session holds no tests.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Total number of events across all tests.
    pub fn total_events(&self) -> usize {
        self.tests.values().map(|t| t.len()).sum()
    }

    /// Count of tests with the given status (`None` counts unfinished tests).
    pub fn count_with_status(&self, status: Option<TestStatus>) -> usize {
        self.tests.values().filter(|t| t.status == status).count()
    }
}
