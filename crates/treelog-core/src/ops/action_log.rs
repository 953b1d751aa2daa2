use std::sync::Arc;
use std::time::Instant;

use treelog_core_types::schema::OP_OPTIMIZE;

use super::compaction::{self, Compaction, CompactionReport};
use crate::errors::{Result, TreeLogError};
use crate::model::{Action, ActionId, ActionKind, Content, IdAllocator};
use crate::policy::CreatePolicy;
use crate::{log_op_end, log_op_error, log_op_start};

/// Ordered, append-only record of file mutations
///
/// A log is filled by a single writer, compacted once with
/// [`optimize`](ActionLog::optimize), then replayed in order against a
/// [`Host`](crate::host::Host). Appends never fail: whether an action makes
/// sense (a create of an existing file, a rename of a missing one) is for
/// the host to decide at replay time.
///
/// Ids come from the log's [`IdAllocator`]. Logs built with
/// [`ActionLog::new`] get a private allocator; pass a shared one to
/// [`ActionLog::with_allocator`] to keep several logs on one id sequence.
///
/// # Example
/// ```
/// use treelog_core::ActionLog;
///
/// let mut log = ActionLog::new();
/// log.create("a", "x");
/// log.rename("a", "b");
/// log.overwrite("b", "y");
///
/// log.optimize();
///
/// assert_eq!(log.len(), 1);
/// assert_eq!(log[0].path(), "b");
/// ```
#[derive(Debug, Clone)]
pub struct ActionLog {
    actions: Vec<Action>,
    ids: Arc<IdAllocator>,
}

impl ActionLog {
    /// Create an empty log with its own id allocator
    pub fn new() -> Self {
        Self::with_allocator(Arc::new(IdAllocator::new()))
    }

    /// Create an empty log drawing ids from `ids`
    pub fn with_allocator(ids: Arc<IdAllocator>) -> Self {
        Self {
            actions: Vec::new(),
            ids,
        }
    }

    /// The allocator this log draws ids from
    pub fn allocator(&self) -> &Arc<IdAllocator> {
        &self.ids
    }

    fn append(&mut self, path: String, kind: ActionKind) -> ActionId {
        let id = self.ids.next_id();
        let parent = self.last().map_or(ActionId::NONE, Action::id);
        self.actions.push(Action::new(id, parent, path, kind));
        id
    }

    /// Record the creation of `path` with `content`
    pub fn create(&mut self, path: impl Into<String>, content: impl Into<Content>) -> ActionId {
        let content = content.into();
        self.append(path.into(), ActionKind::Create { content })
    }

    /// Record a replacement of the content of `path`
    pub fn overwrite(&mut self, path: impl Into<String>, content: impl Into<Content>) -> ActionId {
        let content = content.into();
        self.append(path.into(), ActionKind::Overwrite { content })
    }

    /// Record a move of `path` to `to`
    pub fn rename(&mut self, path: impl Into<String>, to: impl Into<String>) -> ActionId {
        let to = to.into();
        self.append(path.into(), ActionKind::Rename { to })
    }

    /// Record the removal of `path`
    pub fn delete(&mut self, path: impl Into<String>) -> ActionId {
        self.append(path.into(), ActionKind::Delete)
    }

    /// Append an action created elsewhere (a copy retained from before a
    /// compaction, or one decoded from a record)
    ///
    /// The action keeps its id and parent. The log's allocator is advanced
    /// past the id so later appends still sort after it.
    ///
    /// # Errors
    /// * `ActionOutOfOrder` - if the id does not sort after the current last
    ///   action, which would break id ordering within the log
    pub fn push(&mut self, action: Action) -> Result<()> {
        if let Some(last) = self.last() {
            if action.id() <= last.id() {
                return Err(TreeLogError::ActionOutOfOrder {
                    id: action.id().get(),
                    last: last.id().get(),
                });
            }
        }
        self.ids.advance_past(action.id());
        self.actions.push(action);
        Ok(())
    }

    /// True if an action with the same id is in the log
    ///
    /// Ids are strictly increasing within a log, so this is a binary search.
    pub fn has(&self, action: &Action) -> bool {
        self.contains_id(action.id())
    }

    pub fn contains_id(&self, id: ActionId) -> bool {
        self.actions
            .binary_search_by_key(&id, |a| a.id())
            .is_ok()
    }

    /// First action, in log order, matching `predicate`
    pub fn find<P>(&self, mut predicate: P) -> Option<&Action>
    where
        P: FnMut(&Action) -> bool,
    {
        self.actions.iter().find(|a| predicate(*a))
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn last(&self) -> Option<&Action> {
        self.actions.last()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over the current actions in order
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Compact the log in place, folding duplicate creates as overwrites
    ///
    /// Never fails. The surviving actions are appended afresh, so they get
    /// new ids and a new parent chain; ids from before the call are no
    /// longer [`has`](ActionLog::has) members.
    pub fn optimize(&mut self) -> CompactionReport {
        let started = Instant::now();
        log_op_start!(OP_OPTIMIZE, log_len = self.len());

        let compaction = compaction::compact_lenient(&self.actions);
        self.install(compaction, started)
    }

    /// Compact the log in place under an explicit duplicate-create policy
    ///
    /// # Errors
    /// * `DuplicateCreate` - if `policy` refuses a fold; the log is left
    ///   exactly as it was
    pub fn optimize_with(&mut self, policy: &dyn CreatePolicy) -> Result<CompactionReport> {
        let started = Instant::now();
        log_op_start!(OP_OPTIMIZE, log_len = self.len());

        match compaction::compact(&self.actions, policy) {
            Ok(compaction) => Ok(self.install(compaction, started)),
            Err(err) => {
                log_op_error!(
                    OP_OPTIMIZE,
                    err.clone(),
                    duration_ms = started.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    /// Replace the actions with the compacted intents and log the end event
    fn install(&mut self, compaction: Compaction, started: Instant) -> CompactionReport {
        let Compaction { intents, report } = compaction;
        self.actions = Vec::with_capacity(intents.len());
        for (path, kind) in intents {
            self.append(path, kind);
        }

        log_op_end!(
            OP_OPTIMIZE,
            duration_ms = started.elapsed().as_millis() as u64,
            len_before = report.before,
            len_after = report.after,
            folded = report.folded,
            dropped = report.dropped
        );
        report
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for ActionLog {
    type Output = Action;

    fn index(&self, index: usize) -> &Action {
        &self.actions[index]
    }
}

impl<'a> IntoIterator for &'a ActionLog {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_log_is_empty() {
        let log = ActionLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.get(0).is_none());
    }

    #[test]
    fn test_parent_chain() {
        let mut log = ActionLog::new();
        let first = log.create("a", "1");
        let second = log.overwrite("a", "2");
        log.delete("a");

        assert_eq!(log[0].parent(), ActionId::NONE);
        assert_eq!(log[1].parent(), first);
        assert_eq!(log[2].parent(), second);
    }

    #[test]
    fn test_append_returns_allocated_id() {
        let mut log = ActionLog::with_allocator(Arc::new(IdAllocator::starting_at(40)));
        assert_eq!(log.create("a", "1"), ActionId::new(40));
        assert_eq!(log.rename("a", "b"), ActionId::new(41));
        assert_eq!(log[1].id(), ActionId::new(41));
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut log = ActionLog::new();
        log.create("a", "1");
        let wanted = log.overwrite("b", "2");
        log.overwrite("b", "3");

        let found = log
            .find(|a| a.path() == "b")
            .expect("an action on b");
        assert_eq!(found.id(), wanted);
        assert!(log.find(|a| a.path() == "zzz").is_none());
    }

    #[test]
    fn test_push_rejects_out_of_order() {
        let mut log = ActionLog::new();
        log.create("a", "1");
        log.create("b", "2");
        let stale = log[0].clone();

        let err = log.push(stale).unwrap_err();
        assert!(matches!(err, TreeLogError::ActionOutOfOrder { id: 1, last: 2 }));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_push_advances_allocator() {
        let ids = Arc::new(IdAllocator::new());
        let mut source = ActionLog::with_allocator(Arc::new(IdAllocator::starting_at(50)));
        source.create("a", "1");

        let mut log = ActionLog::with_allocator(Arc::clone(&ids));
        log.push(source[0].clone()).unwrap();
        let next = log.delete("a");

        assert_eq!(next, ActionId::new(51));
        assert!(log.has(&source[0]));
    }

    #[test]
    fn test_optimize_reports_real_counts() {
        let mut log = ActionLog::new();
        log.create("a", "1");
        log.create("a", "2");
        log.delete("gone");

        let report = log.optimize();

        assert_eq!(
            report,
            CompactionReport {
                before: 3,
                after: 2,
                folded: 1,
                annihilated: 0,
                dropped: 0,
            }
        );
        assert_eq!(report.after, log.len());
    }

    #[test]
    fn test_into_iterator() {
        let mut log = ActionLog::new();
        log.create("a", "1");
        log.create("b", "2");

        let paths: Vec<&str> = (&log).into_iter().map(Action::path).collect();
        assert_eq!(paths, vec!["a", "b"]);
    }
}
