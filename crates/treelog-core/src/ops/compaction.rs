//! Log compaction
//!
//! Rewrites a sequence of actions into a shorter one with the same net
//! effect. Only chains anchored on a Create are folded: a path the log
//! created has no outside existence until the log is applied, so only its
//! final shape matters. Actions on paths the log did not create are kept
//! one by one, in order, unless an earlier fold already proved the path is
//! deleted.
//!
//! The algorithm reads an immutable snapshot and marks folded entries in a
//! `consumed` bitmap instead of splicing them out.

use std::collections::HashSet;
use std::convert::Infallible;

use crate::errors::{Result, TreeLogError};
use crate::model::{Action, ActionKind, Content};
use crate::policy::CreatePolicy;

/// Counts describing one compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactionReport {
    /// Actions in the log before compaction
    pub before: usize,
    /// Actions in the log after compaction
    pub after: usize,
    /// Later actions merged into a Create chain
    pub folded: usize,
    /// Create chains that ended in a Delete and vanished
    pub annihilated: usize,
    /// Actions dropped because their path was already known to be deleted
    pub dropped: usize,
}

/// Output of [`compact`]: the surviving intents in order, without ids
///
/// Ids and parents are assigned when the intents are appended back into a
/// log.
#[derive(Debug, Clone)]
pub struct Compaction {
    pub intents: Vec<(String, ActionKind)>,
    pub report: CompactionReport,
}

/// Compact `actions` into the minimal equivalent sequence of intents
///
/// # Errors
/// * `DuplicateCreate` - if `policy` refuses to fold a Create into a chain
///   that already created the same path
pub fn compact(actions: &[Action], policy: &dyn CreatePolicy) -> Result<Compaction> {
    compact_by(actions, |path| {
        if policy.allows_duplicate_create(path) {
            Ok(())
        } else {
            Err(TreeLogError::DuplicateCreate {
                path: path.to_string(),
            })
        }
    })
}

/// Compact `actions`, folding every duplicate Create as an Overwrite
pub fn compact_lenient(actions: &[Action]) -> Compaction {
    match compact_by(actions, |_| Ok::<(), Infallible>(())) {
        Ok(compaction) => compaction,
        Err(never) => match never {},
    }
}

/// Shared pass; `on_duplicate` is asked before a second Create is folded
/// into a live chain and aborts the pass by returning `Err`
fn compact_by<E, F>(actions: &[Action], mut on_duplicate: F) -> std::result::Result<Compaction, E>
where
    F: FnMut(&str) -> std::result::Result<(), E>,
{
    let mut consumed = vec![false; actions.len()];
    let mut deleted: HashSet<&str> = HashSet::new();
    let mut intents = Vec::new();
    let mut report = CompactionReport {
        before: actions.len(),
        ..CompactionReport::default()
    };

    for (i, action) in actions.iter().enumerate() {
        if consumed[i] {
            continue;
        }

        match action.kind() {
            ActionKind::Create { content } => {
                deleted.remove(action.path());

                let chain = fold_chain(actions, i, content, &mut consumed, &mut on_duplicate)?;
                report.folded += chain.folded;

                if chain.deleted {
                    report.annihilated += 1;
                    deleted.insert(chain.path);
                } else {
                    intents.push((
                        chain.path.to_string(),
                        ActionKind::Create {
                            content: chain.content.clone(),
                        },
                    ));
                }
            }
            _ if deleted.contains(action.path()) => {
                report.dropped += 1;
            }
            kind => intents.push((action.path().to_string(), kind.clone())),
        }
    }

    report.after = intents.len();
    Ok(Compaction { intents, report })
}

struct Chain<'a> {
    path: &'a str,
    content: &'a Content,
    deleted: bool,
    folded: usize,
}

/// Follow the file created at `actions[start]` through every later action
/// that touches it, consuming each one
fn fold_chain<'a, E, F>(
    actions: &'a [Action],
    start: usize,
    content: &'a Content,
    consumed: &mut [bool],
    on_duplicate: &mut F,
) -> std::result::Result<Chain<'a>, E>
where
    F: FnMut(&str) -> std::result::Result<(), E>,
{
    let mut chain = Chain {
        path: actions[start].path(),
        content,
        deleted: false,
        folded: 0,
    };

    for (j, later) in actions.iter().enumerate().skip(start + 1) {
        if consumed[j] || later.path() != chain.path {
            continue;
        }

        match later.kind() {
            ActionKind::Create { content } => {
                on_duplicate(chain.path)?;
                chain.content = content;
            }
            ActionKind::Overwrite { content } => chain.content = content,
            ActionKind::Rename { to } => chain.path = to,
            ActionKind::Delete => chain.deleted = true,
        }

        consumed[j] = true;
        chain.folded += 1;

        if chain.deleted {
            break;
        }
    }

    Ok(chain)
}
