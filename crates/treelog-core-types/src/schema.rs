//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across the logging macros,
//! the error facility and the tests that assert on captured events.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Action identifiers
pub const FIELD_ACTION_ID: &str = "action_id";
pub const FIELD_ACTION_KIND: &str = "action_kind";
pub const FIELD_PATH: &str = "path";

// Log sizes
pub const FIELD_LOG_LEN: &str = "log_len";
pub const FIELD_LEN_BEFORE: &str = "len_before";
pub const FIELD_LEN_AFTER: &str = "len_after";
pub const FIELD_FOLDED: &str = "folded";
pub const FIELD_DROPPED: &str = "dropped";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_OPTIMIZE: &str = "optimize";
pub const OP_REPLAY: &str = "replay";
