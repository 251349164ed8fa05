// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[allow(dead_code)]
mod errors {
    pub struct ValueError;
    pub struct Wrapper<T>(pub T);
}

fn record(result: OperationResult) -> OperationRecord {
    OperationRecord::sample("test_op", result)
}

#[test]
fn short_type_name_strips_path_and_generics() {
    assert_eq!(short_type_name::<errors::ValueError>(), "ValueError");
    assert_eq!(short_type_name::<errors::Wrapper<errors::ValueError>>(), "Wrapper");
    assert_eq!(short_type_name::<String>(), "String");
    assert_eq!(short_type_name::<str>(), "str");
}

#[test]
fn display_success_line() {
    let rec = record(OperationResult::Success);
    assert_eq!(
        rec.to_string(),
        "2023-06-22 06:27:53.000000 (1000ms): [test_op / Success]"
    );
}

#[test]
fn display_failure_line_includes_exception_and_props() {
    let mut rec = record(OperationResult::Failure);
    rec.exception_type = Some("ValueError".to_string());
    rec.exception_message = Some("boom".to_string());
    rec.custom_props.insert("k", 1).unwrap();

    assert_eq!(
        rec.to_string(),
        "2023-06-22 06:27:53.000000 (1000ms): [test_op / Failure] ValueError: boom {k: 1}"
    );
}

#[test]
fn display_start_line_has_no_duration() {
    let mut rec = record(OperationResult::Pending);
    rec.step = OperationStep::Start;
    rec.duration_ms = None;
    assert_eq!(rec.to_string(), "2023-06-22 06:27:53.000000: [test_op / started]");
}

#[test]
fn record_serializes_with_structured_fields() {
    let rec = record(OperationResult::Success);
    let json: serde_json::Value = serde_json::to_value(&rec).unwrap();

    assert_eq!(json["step"], "end");
    assert_eq!(json["result"], "Success");
    assert_eq!(json["parent_id"], serde_json::Value::Null);
    assert_eq!(json["duration"], "1s");
    assert_eq!(json["duration_ms"], 1000);
    assert!(json["custom_props"].as_object().unwrap().is_empty());
}

#[test]
fn traceback_serializes_as_a_list_and_null_when_absent() {
    let rec = record(OperationResult::Success);
    let json: serde_json::Value = serde_json::to_value(&rec).unwrap();
    assert_eq!(json["traceback"], serde_json::Value::Null);

    let mut rec = record(OperationResult::Failure);
    rec.traceback = Some(vec!["request failed".to_string(), "connection reset".to_string()]);
    let json: serde_json::Value = serde_json::to_value(&rec).unwrap();
    assert_eq!(json["traceback"], serde_json::json!(["request failed", "connection reset"]));
}
