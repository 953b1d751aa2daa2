use thiserror::Error;
use treelog_core_types::{RequestId, TraceId};

/// Result type alias using TreeLogError
pub type Result<T> = std::result::Result<T, TreeLogError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// depending on the shape of [`TreeLogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Action records
    InvalidInput,
    UnknownAction,
    Serialization,

    // Log structure
    OutOfOrder,

    // Compaction policy
    PolicyDenied,

    // Replay
    AlreadyExists,
    NotFound,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownAction => "ERR_UNKNOWN_ACTION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::OutOfOrder => "ERR_OUT_OF_ORDER",
            ExErrorKind::PolicyDenied => "ERR_POLICY_DENIED",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever context was known where the
/// error surfaced: the operation, the path and action involved, and the
/// correlation ids of the surrounding replay.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    action_id: Option<u64>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            action_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_action_id(mut self, id: u64) -> Self {
        self.action_id = Some(id);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn action_id(&self) -> Option<u64> {
        self.action_id
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(id) = self.action_id {
            write!(f, " (action: {})", id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for treelog operations
///
/// Appending to a log and the default compaction never fail. Everything
/// here comes from the surrounding layers: decoding loosely-typed action
/// records, pushing foreign actions, strict compaction and replay.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeLogError {
    // ===== Action records =====
    /// Record carries a kind outside `c`, `o`, `r`, `d`
    #[error("Unknown action: \"{kind}\"")]
    UnknownAction { kind: String },

    /// Record is structurally incomplete
    #[error("Malformed action: {reason}")]
    MalformedAction { reason: String },

    /// JSON could not be parsed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    // ===== Log structure =====
    /// Pushed action does not sort after the current last action
    #[error("Action {id} is out of order: log already ends at action {last}")]
    ActionOutOfOrder { id: u64, last: u64 },

    // ===== Compaction =====
    /// A Create was folded onto a path its chain had already created
    #[error("Duplicate create refused by policy: {path}")]
    DuplicateCreate { path: String },

    // ===== Replay =====
    #[error("File already exists: {path}")]
    FileAlreadyExists { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Replay stopped at the given action
    #[error("Replay failed at action {action_id}: {source}")]
    ReplayFailed {
        action_id: u64,
        request_id: RequestId,
        trace_id: Option<TraceId>,
        #[source]
        source: Box<TreeLogError>,
    },
}

impl From<serde_json::Error> for TreeLogError {
    fn from(err: serde_json::Error) -> Self {
        TreeLogError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<TreeLogError> for ExError {
    fn from(err: TreeLogError) -> Self {
        match err {
            TreeLogError::UnknownAction { kind } => ExError::new(ExErrorKind::UnknownAction)
                .with_op("decode_action")
                .with_message(format!("Unknown action kind \"{}\"", kind)),

            TreeLogError::MalformedAction { reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("decode_action")
                .with_message(reason),

            TreeLogError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            TreeLogError::ActionOutOfOrder { id, last } => ExError::new(ExErrorKind::OutOfOrder)
                .with_op("push")
                .with_action_id(id)
                .with_message(format!("Log already ends at action {}", last)),

            TreeLogError::DuplicateCreate { path } => ExError::new(ExErrorKind::PolicyDenied)
                .with_op("optimize")
                .with_path(path)
                .with_message("Duplicate create refused by policy"),

            TreeLogError::FileAlreadyExists { path } => ExError::new(ExErrorKind::AlreadyExists)
                .with_path(path)
                .with_message("File already exists"),

            TreeLogError::FileNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_path(path)
                .with_message("File not found"),

            TreeLogError::ReplayFailed {
                action_id,
                request_id,
                trace_id,
                source,
            } => {
                let inner: ExError = (*source).into();
                let mut outer = ExError::new(inner.kind())
                    .with_op("replay")
                    .with_action_id(action_id)
                    .with_request_id(request_id)
                    .with_message(inner.message().to_string());
                if let Some(path) = inner.path() {
                    outer = outer.with_path(path);
                }
                if let Some(trace_id) = trace_id {
                    outer = outer.with_trace_id(trace_id);
                }
                outer.with_source(inner)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::UnknownAction,
            ExErrorKind::Serialization,
            ExErrorKind::OutOfOrder,
            ExErrorKind::PolicyDenied,
            ExErrorKind::AlreadyExists,
            ExErrorKind::NotFound,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_unknown_action_message_names_kind() {
        let err = TreeLogError::UnknownAction {
            kind: "x".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown action: \"x\"");
    }

    #[test]
    fn test_replay_failed_keeps_inner_path() {
        let err = TreeLogError::ReplayFailed {
            action_id: 9,
            request_id: RequestId::from_string("req-9".to_string()),
            trace_id: None,
            source: Box::new(TreeLogError::FileNotFound {
                path: "src/main.rs".to_string(),
            }),
        };

        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::NotFound);
        assert_eq!(ex.op(), Some("replay"));
        assert_eq!(ex.action_id(), Some(9));
        assert_eq!(ex.path(), Some("src/main.rs"));
        assert_eq!(ex.request_id().map(|r| r.as_str()), Some("req-9"));
        assert!(ex.trace_id().is_none());
        assert!(ex.source_error().is_some());
    }

    #[test]
    fn test_display_includes_code_and_path() {
        let ex = ExError::new(ExErrorKind::AlreadyExists)
            .with_path("a.txt")
            .with_message("File already exists");
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_ALREADY_EXISTS]"));
        assert!(rendered.contains("(path: a.txt)"));
    }
}
