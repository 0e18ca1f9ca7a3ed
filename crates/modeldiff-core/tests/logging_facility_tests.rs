#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::test_schema;
use modeldiff_core::errors::ModelDiffError;
use modeldiff_core::logging_facility::test_capture::init_test_capture;
use modeldiff_core::{log_op_end, log_op_error, log_op_start, ComparatorConfig, ComparatorDef};
use modeldiff_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(start_events, 1, "Should have captured one start event");
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .expect("Should have end event");
    assert_eq!(end_event.fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ModelDiffError::TypeMismatch {
        first: "int".to_string(),
        second: "text".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let events = capture.events();
    let error_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("Should have error event");
    assert_eq!(
        error_event.fields.get("err.code"),
        Some(&"ERR_TYPE_MISMATCH".to_string())
    );
}

#[test]
fn test_registry_build_logs_start_and_end() {
    let capture = init_test_capture();

    ComparatorDef::build(
        test_schema(),
        ComparatorConfig::new("LoggedPersonComparator")
            .model("Person")
            .fields(["name", "age"]),
    )
    .unwrap();

    let events = capture.events_for("LoggedPersonComparator", "build_registry");
    let starts = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    let ends: Vec<_> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(starts, 1);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].fields.get("registry_len"), Some(&"2".to_string()));
}

#[test]
fn test_failed_registry_build_logs_error_code() {
    let capture = init_test_capture();

    let result = ComparatorDef::build(
        test_schema(),
        ComparatorConfig::new("BrokenPersonComparator")
            .model("Person")
            .fields(["nonexistent"]),
    );
    assert!(result.is_err());

    let events = capture.events_for("BrokenPersonComparator", "build_registry");
    let error_event = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(
        error_event.fields.get("err.code"),
        Some(&"ERR_UNKNOWN_FIELD".to_string())
    );
    assert!(events
        .iter()
        .all(|e| e.event.as_deref() != Some(EVENT_END)));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}
