pub mod action;
pub mod content;
pub mod id_allocator;

pub use action::{Action, ActionId, ActionKind};
pub use content::Content;
pub use id_allocator::IdAllocator;
