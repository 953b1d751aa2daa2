//! Replaying a log against a host
//!
//! Replay applies every action of a log, in order, to a [`Host`]. It stops
//! at the first action the host refuses and reports which one it was.
//! Actions before it have already been applied; callers that need
//! all-or-nothing behavior on a [`MemoryHost`] use [`apply_log`], which
//! works on an owned state the caller can keep a copy of.
//!
//! ## Example
//!
//! ```
//! use treelog_core::{apply_log, ActionLog, MemoryHost};
//!
//! let mut log = ActionLog::new();
//! log.create("a", "x");
//! log.rename("a", "b");
//! log.optimize();
//!
//! let state = apply_log(MemoryHost::new(), &log).unwrap();
//! assert!(state.files().any(|(path, _)| path == "b"));
//! ```

use std::time::Instant;

use tracing::info_span;
use treelog_core_types::schema::OP_REPLAY;
use treelog_core_types::RequestContext;

use crate::errors::{Result, TreeLogError};
use crate::host::{Host, MemoryHost};
use crate::model::ActionKind;
use crate::ops::ActionLog;
use crate::{log_op_end, log_op_error, log_op_start};

/// Counts of the actions a replay applied, by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    pub created: usize,
    pub overwritten: usize,
    pub renamed: usize,
    pub deleted: usize,
}

impl ReplayReport {
    pub fn applied(&self) -> usize {
        self.created + self.overwritten + self.renamed + self.deleted
    }

    fn record(&mut self, kind: &ActionKind) {
        match kind {
            ActionKind::Create { .. } => self.created += 1,
            ActionKind::Overwrite { .. } => self.overwritten += 1,
            ActionKind::Rename { .. } => self.renamed += 1,
            ActionKind::Delete => self.deleted += 1,
        }
    }
}

/// Apply every action of `log` to `host`, in order
///
/// Runs inside a span carrying the context's request id so that events
/// logged by the host can be correlated with the replay.
///
/// # Errors
/// * `ReplayFailed` - wrapping the host's error, with the id of the action
///   that failed and the context's request and trace ids
pub fn replay(log: &ActionLog, host: &mut dyn Host, ctx: &RequestContext) -> Result<ReplayReport> {
    let span = info_span!(
        "replay",
        request_id = %ctx.request_id,
        trace_id = ?ctx.trace_id.as_ref().map(|t| t.as_str())
    );
    let _guard = span.enter();

    let started = Instant::now();
    log_op_start!(OP_REPLAY, log_len = log.len());

    let mut report = ReplayReport::default();
    for action in log {
        if let Err(source) = host.apply(action) {
            let err = TreeLogError::ReplayFailed {
                action_id: action.id().get(),
                request_id: ctx.request_id.clone(),
                trace_id: ctx.trace_id.clone(),
                source: Box::new(source),
            };
            log_op_error!(
                OP_REPLAY,
                err.clone(),
                duration_ms = started.elapsed().as_millis() as u64,
                action_id = action.id().get(),
                action_kind = action.kind().name(),
                path = action.path()
            );
            return Err(err);
        }
        report.record(action.kind());
    }

    log_op_end!(
        OP_REPLAY,
        duration_ms = started.elapsed().as_millis() as u64,
        applied = report.applied()
    );
    Ok(report)
}

/// Replay `log` onto an owned in-memory state, returning the new state
///
/// If this returns `Err`, the state passed in is gone, but nothing the
/// caller kept (for example a clone taken beforehand) was touched.
///
/// # Errors
/// Same as [`replay`]
pub fn apply_log(mut state: MemoryHost, log: &ActionLog) -> Result<MemoryHost> {
    replay(log, &mut state, &RequestContext::new())?;
    Ok(state)
}
