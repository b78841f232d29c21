//! Writing a log to disk and loading it back.

use serde_json::json;
use vdebug_parser::{parse_file, JsonMessage, LogWriter, TraceEvent};
use vdebug_test_helpers::LogBuilder;
use vdebug_types::{EventKind, TestStatus};

#[test]
fn test_file_written_by_simulation_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.log");

    let mut writer = LogWriter::create(&path).unwrap();
    writer.node_ids(["3", "1", "2"]).unwrap();
    for (name, status) in [("elects_leader", TestStatus::Passed), ("split_brain", TestStatus::Failed)] {
        writer.begin_test(name).unwrap();
        writer
            .trace_event(&TraceEvent::MessageSend {
                msg: JsonMessage::new("RequestVote", json!({"term": 1})),
                src: "1".to_string(),
                dst: "2".to_string(),
                ts: 0.5,
            })
            .unwrap();
        writer
            .trace_event(&TraceEvent::NetworkPartition {
                group1: vec!["1".to_string()],
                group2: vec!["2".to_string(), "3".to_string()],
                ts: 0.6,
            })
            .unwrap();
        let error = (status == TestStatus::Failed).then_some("two leaders in term 2");
        writer.end_test(status, error).unwrap();
    }
    writer.flush().unwrap();

    let session = parse_file(&path).unwrap();
    assert_eq!(session.len(), 2);
    assert_eq!(session.node_ids.len(), 3);
    assert_eq!(session.count_with_status(Some(TestStatus::Passed)), 1);
    assert_eq!(session.count_with_status(Some(TestStatus::Failed)), 1);

    let failed = session.test("split_brain").unwrap();
    assert_eq!(failed.error.as_deref(), Some("two leaders in term 2"));
    assert_eq!(failed.events[1].kind, EventKind::NetworkPartition);
    assert_eq!(
        TraceEvent::from_event(&failed.events[0]).unwrap().kind(),
        EventKind::MessageSend
    );
}

#[test]
fn test_builder_log_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ping.log");
    std::fs::write(&path, LogBuilder::ping_pong()).unwrap();

    let session = parse_file(&path).unwrap();
    let names: Vec<_> = session.tests.keys().map(String::as_str).collect();
    assert_eq!(names, ["ping_pong", "lost_pong"]);
    assert_eq!(session.total_events(), 14);
}
