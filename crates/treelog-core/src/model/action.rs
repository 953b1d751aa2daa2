use std::fmt;

use super::Content;

/// Identifier of an action
///
/// Ids are handed out by an [`IdAllocator`](super::IdAllocator) and are
/// strictly increasing within a log. `ActionId::NONE` (0) is the parent of
/// the first action in a log and is never allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(u64);

impl ActionId {
    /// Sentinel parent of the first action in a log
    pub const NONE: ActionId = ActionId(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an action does to its path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Produce a file that does not exist yet
    Create { content: Content },

    /// Replace the content of an existing file
    Overwrite { content: Content },

    /// Move the file to `to`; content is unaffected
    Rename { to: String },

    /// Remove the file
    Delete,
}

impl ActionKind {
    /// One-letter tag used by action records: `c`, `o`, `r` or `d`
    pub fn tag(&self) -> char {
        match self {
            ActionKind::Create { .. } => 'c',
            ActionKind::Overwrite { .. } => 'o',
            ActionKind::Rename { .. } => 'r',
            ActionKind::Delete => 'd',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Create { .. } => "create",
            ActionKind::Overwrite { .. } => "overwrite",
            ActionKind::Rename { .. } => "rename",
            ActionKind::Delete => "delete",
        }
    }

    /// True for Create and Overwrite, the kinds that carry content
    pub fn is_content_action(&self) -> bool {
        matches!(
            self,
            ActionKind::Create { .. } | ActionKind::Overwrite { .. }
        )
    }

    pub fn content(&self) -> Option<&Content> {
        match self {
            ActionKind::Create { content } | ActionKind::Overwrite { content } => Some(content),
            ActionKind::Rename { .. } | ActionKind::Delete => None,
        }
    }

    pub fn destination(&self) -> Option<&str> {
        match self {
            ActionKind::Rename { to } => Some(to),
            _ => None,
        }
    }
}

/// A single recorded intent to mutate one path
///
/// Actions are created by an [`ActionLog`](crate::ops::ActionLog) and never
/// change afterwards. Two actions are equal when they have the same id:
/// two overwrites of one path with identical content are still distinct
/// intents. Use [`Action::same_intent`] to compare what actions do.
#[derive(Debug, Clone)]
pub struct Action {
    id: ActionId,
    parent: ActionId,
    path: String,
    kind: ActionKind,
}

impl Action {
    pub(crate) fn new(id: ActionId, parent: ActionId, path: String, kind: ActionKind) -> Self {
        Self {
            id,
            parent,
            path,
            kind,
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Id of the action that preceded this one in its log when it was
    /// appended, or `ActionId::NONE`
    pub fn parent(&self) -> ActionId {
        self.parent
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn content(&self) -> Option<&Content> {
        self.kind.content()
    }

    pub fn destination(&self) -> Option<&str> {
        self.kind.destination()
    }

    pub fn is_content_action(&self) -> bool {
        self.kind.is_content_action()
    }

    /// True if both actions do the same thing to the same path, ignoring ids
    pub fn same_intent(&self, other: &Action) -> bool {
        self.path == other.path && self.kind == other.kind
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Action {}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Rename { to } => write!(f, "{} rename {} -> {}", self.id, self.path, to),
            kind => write!(f, "{} {} {}", self.id, kind.name(), self.path),
        }
    }
}
