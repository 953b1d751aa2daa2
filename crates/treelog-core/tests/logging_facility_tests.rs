#![allow(clippy::unwrap_used, clippy::expect_used)]

use treelog_core::errors::{ExError, ExErrorKind, TreeLogError};
use treelog_core::logging_facility::test_capture::init_test_capture;
use treelog_core::{
    apply_log, log_op_end, log_op_error, log_op_start, ActionLog, MemoryHost, StrictCreatePolicy,
};
use treelog_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START, OP_OPTIMIZE, OP_REPLAY};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.events_for(op_name, EVENT_START);
    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name, EVENT_END);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = TreeLogError::FileNotFound {
        path: "a.txt".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].field("err.code"), Some("ERR_NOT_FOUND"));
    assert_eq!(error_events[0].field("err.kind"), Some("NotFound"));
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_4";

    log_op_start!(op_name, path = "a");
    log_op_end!(op_name, duration_ms = 1);

    let starts = capture.events_for(op_name, EVENT_START).len();
    let ends = capture.events_for(op_name, EVENT_END).len();

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends, 1, "Should have exactly one end event");
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_5";

    log_op_start!(op_name, path = "src/lib.rs", log_len = 3);

    let events = capture.events_for(op_name, EVENT_START);
    let start_event = events.first().expect("Should have start event");

    assert_eq!(start_event.field("path"), Some("src/lib.rs"));
    assert_eq!(start_event.field("log_len"), Some("3"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_error_conversion_preserves_kind() {
    let capture = init_test_capture();
    let op_name = "test_error_conversion_unique_6";

    let err = TreeLogError::DuplicateCreate {
        path: "Cargo.toml".to_string(),
    };
    log_op_error!(op_name, err.clone(), duration_ms = 5);

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::PolicyDenied);

    let events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(events[0].field("err.code"), Some("ERR_POLICY_DENIED"));
}

#[test]
fn test_optimize_logs_start_and_end_with_counts() {
    // GIVEN a log of a distinctive length
    let capture = init_test_capture();
    let mut log = ActionLog::new();
    for i in 0..17 {
        log.create(format!("optimize_counts/{}", i), "x");
    }
    log.delete("optimize_counts/0");

    // WHEN compacted
    log.optimize();

    // THEN one start and one end event carry the sizes
    let starts = capture.count_events(|e| {
        e.is(OP_OPTIMIZE, EVENT_START) && e.field("log_len") == Some("18")
    });
    assert_eq!(starts, 1);

    let end = capture
        .events_for(OP_OPTIMIZE, EVENT_END)
        .into_iter()
        .find(|e| e.field("len_before") == Some("18"))
        .expect("optimize end event");
    assert_eq!(end.field("len_after"), Some("16"));
    assert_eq!(end.field("folded"), Some("1"));
    assert!(end.field("duration_ms").is_some());
}

#[test]
fn test_refused_optimize_logs_end_error() {
    let capture = init_test_capture();
    let mut log = ActionLog::new();
    log.create("refused_optimize.txt", "1");
    log.create("refused_optimize.txt", "2");

    let result = log.optimize_with(&StrictCreatePolicy);

    assert!(result.is_err());
    let refused = capture.count_events(|e| {
        e.is(OP_OPTIMIZE, EVENT_END_ERROR) && e.field("err.code") == Some("ERR_POLICY_DENIED")
    });
    assert!(refused >= 1);
}

#[test]
fn test_replay_failure_logs_failing_action() {
    // GIVEN a log deleting a file the host does not have
    let capture = init_test_capture();
    let mut log = ActionLog::new();
    let bad = log.delete("replay_failure_unique.txt");

    // WHEN replayed
    let result = apply_log(MemoryHost::new(), &log);

    // THEN the end_error event names the action, its kind and its path
    assert!(result.is_err());
    let event = capture
        .events_for(OP_REPLAY, EVENT_END_ERROR)
        .into_iter()
        .find(|e| e.field("path") == Some("replay_failure_unique.txt"))
        .expect("replay end_error event");
    assert_eq!(event.field("action_id"), Some(bad.get().to_string().as_str()));
    assert_eq!(event.field("action_kind"), Some("delete"));
    assert_eq!(event.field("err.code"), Some("ERR_NOT_FOUND"));
}
