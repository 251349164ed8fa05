// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with tracing output captured
fn with_tracing(f: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

#[test]
fn tracing_sink_logs_success_at_info() {
    let logs = with_tracing(|| {
        TracingSink::new("billing").emit(&OperationRecord::sample("charge", OperationResult::Success));
    });

    assert!(logs.contains("INFO"), "Logs:\n{}", logs);
    assert!(logs.contains("operation succeeded"), "Logs:\n{}", logs);
    assert!(logs.contains("logger=\"billing\""), "Logs:\n{}", logs);
    assert!(logs.contains("operation=\"charge\""), "Logs:\n{}", logs);
    assert!(logs.contains("duration_ms=1000"), "Logs:\n{}", logs);
}

#[test]
fn tracing_sink_logs_failure_at_error_with_exception() {
    let mut record = OperationRecord::sample("charge", OperationResult::Failure);
    record.exception_type = Some("ValueError".to_string());
    record.exception_message = Some("boom".to_string());

    let logs = with_tracing(|| TracingSink::default().emit(&record));

    assert!(logs.contains("ERROR"), "Logs:\n{}", logs);
    assert!(logs.contains("operation failed"), "Logs:\n{}", logs);
    assert!(logs.contains("exception_type=\"ValueError\""), "Logs:\n{}", logs);
    assert!(logs.contains("exception_message=\"boom\""), "Logs:\n{}", logs);
}

#[test]
fn tracing_sink_logs_start_records() {
    let mut record = OperationRecord::sample("charge", OperationResult::Pending);
    record.step = OperationStep::Start;

    let logs = with_tracing(|| TracingSink::default().emit(&record));
    assert!(logs.contains("operation started"), "Logs:\n{}", logs);
}

#[test]
fn tracing_sink_uses_custom_serializer() {
    fn short(record: &OperationRecord) -> String {
        format!("<{}>", record.name)
    }

    let logs = with_tracing(|| {
        TracingSink::default()
            .with_serializer(short)
            .emit(&OperationRecord::sample("charge", OperationResult::Success));
    });
    assert!(logs.contains("record=<charge>"), "Logs:\n{}", logs);
}

#[test]
fn json_serializer_round_trips() {
    let record = OperationRecord::sample("charge", OperationResult::Success);
    let parsed: OperationRecord = serde_json::from_str(&json_serializer(&record)).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn memory_sink_collects_in_order() {
    let sink = MemorySink::new();
    sink.emit(&OperationRecord::sample("a", OperationResult::Success));
    sink.emit(&OperationRecord::sample("b", OperationResult::Failure));

    let names: Vec<_> = sink.records().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(sink.find("b").unwrap().result, OperationResult::Failure);

    sink.clear();
    assert!(sink.is_empty());
}

#[test]
fn memory_sink_finished_skips_start_records() {
    let sink = MemorySink::new();
    let mut start = OperationRecord::sample("a", OperationResult::Pending);
    start.step = OperationStep::Start;
    sink.emit(&start);
    sink.emit(&OperationRecord::sample("a", OperationResult::Success));

    assert_eq!(sink.len(), 2);
    assert_eq!(sink.finished().len(), 1);
}

#[tokio::test]
async fn channel_sink_forwards_records() {
    let (sink, mut rx) = ChannelSink::new();
    sink.emit(&OperationRecord::sample("a", OperationResult::Success));

    let received = rx.recv().await.unwrap();
    assert_eq!(received.name, "a");
}

#[test]
fn channel_sink_ignores_closed_receiver() {
    let (sink, rx) = ChannelSink::new();
    drop(rx);
    sink.emit(&OperationRecord::sample("a", OperationResult::Success));
}

#[test]
fn fanout_sink_emits_to_each() {
    let first = MemorySink::new();
    let second = MemorySink::new();
    let fanout = FanoutSink::new().with(first.clone()).with(second.clone());

    fanout.emit(&OperationRecord::sample("a", OperationResult::Success));
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
}
