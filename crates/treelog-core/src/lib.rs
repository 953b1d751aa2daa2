//! treelog core - transactional change log for a virtual file tree
//!
//! This crate records the file mutations a code-generation run wants to make
//! (create, overwrite, rename, delete) without touching any file system, and
//! can compact the record into a minimal equivalent sequence before it is
//! committed:
//! - [`Action`] and [`ActionLog`], the ordered, append-only record
//! - [`ActionLog::optimize`], the compaction pass
//! - [`CreatePolicy`] implementations deciding how duplicate creates fold
//! - [`ActionRecord`], the loosely-typed JSON form of an action
//! - [`Host`], [`MemoryHost`] and [`replay`] for applying a log
//! - Structured errors ([`ExError`]) and logging ([`logging_facility`])

pub mod apply;
pub mod errors;
pub mod host;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod policy;
pub mod record;

// Re-export commonly used types
pub use apply::{apply_log, replay, ReplayReport};
pub use errors::{ExError, ExErrorKind, Result, TreeLogError};
pub use host::{Host, MemoryHost};
pub use model::{Action, ActionId, ActionKind, Content, IdAllocator};
pub use ops::{ActionLog, CompactionReport};
pub use policy::{CreatePolicy, GuardedPathsPolicy, LenientCreatePolicy, StrictCreatePolicy};
pub use record::{is_action, ActionRecord};
