use std::sync::atomic::{AtomicU64, Ordering};

use super::ActionId;

/// Source of action ids
///
/// Every log draws ids from an allocator it is handed at construction, so
/// two logs only share an id sequence when they share an allocator. Ids are
/// handed out strictly increasing and never repeat; the value 0 is reserved
/// for [`ActionId::NONE`] and is never allocated.
///
/// The counter is atomic, so logs living on different threads can share one
/// allocator (behind an `Arc`).
///
/// # Example
/// ```
/// use treelog_core::model::IdAllocator;
///
/// let ids = IdAllocator::starting_at(100);
/// assert_eq!(ids.next_id().get(), 100);
/// assert_eq!(ids.next_id().get(), 101);
/// ```
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Allocator whose first id is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Allocator whose first id is `first` (0 is bumped to 1)
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(1)),
        }
    }

    /// Allocate the next id
    pub fn next_id(&self) -> ActionId {
        ActionId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to `next_id` will return
    pub fn peek(&self) -> ActionId {
        ActionId::new(self.next.load(Ordering::Relaxed))
    }

    /// Make sure no id at or below `id` is allocated from now on
    pub(crate) fn advance_past(&self, id: ActionId) {
        self.next.fetch_max(id.get().saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
