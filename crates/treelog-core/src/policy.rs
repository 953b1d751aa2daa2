//! Duplicate-create policy
//!
//! Compaction folds every later action on a created path into that path's
//! Create. When one of those later actions is itself a Create, the log holds
//! two creations of the same file with no delete in between. Replaying that
//! against a strict host would fail, yet the default compaction quietly
//! treats the second Create as an overwrite. The policy decides which
//! behavior a caller gets.

use std::collections::HashSet;

/// Decides whether compaction may fold a second Create into a live chain
pub trait CreatePolicy {
    /// Check whether a Create at `path` may be folded into the chain that
    /// already created `path`
    ///
    /// # Returns
    /// * `true` - fold it as if it were an Overwrite
    /// * `false` - refuse; compaction fails with `DuplicateCreate`
    fn allows_duplicate_create(&self, path: &str) -> bool;
}

/// Folds duplicate creates as overwrites (the default)
///
/// # Example
/// ```
/// use treelog_core::policy::{CreatePolicy, LenientCreatePolicy};
///
/// assert!(LenientCreatePolicy.allows_duplicate_create("src/lib.rs"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientCreatePolicy;

impl CreatePolicy for LenientCreatePolicy {
    fn allows_duplicate_create(&self, _path: &str) -> bool {
        true
    }
}

/// Refuses every duplicate create
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictCreatePolicy;

impl CreatePolicy for StrictCreatePolicy {
    fn allows_duplicate_create(&self, _path: &str) -> bool {
        false
    }
}

/// Refuses duplicate creates only on the listed paths
///
/// Useful when a handful of generated files must be produced by exactly one
/// rule (a manifest, a lockfile) while everything else stays lenient.
///
/// # Example
/// ```
/// use treelog_core::policy::{CreatePolicy, GuardedPathsPolicy};
///
/// let policy = GuardedPathsPolicy::new(["Cargo.toml"]);
///
/// assert!(!policy.allows_duplicate_create("Cargo.toml"));
/// assert!(policy.allows_duplicate_create("src/lib.rs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GuardedPathsPolicy {
    guarded: HashSet<String>,
}

impl GuardedPathsPolicy {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            guarded: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl CreatePolicy for GuardedPathsPolicy {
    fn allows_duplicate_create(&self, path: &str) -> bool {
        !self.guarded.contains(path)
    }
}
