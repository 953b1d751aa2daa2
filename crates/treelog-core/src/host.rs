//! Hosts an action log can be replayed against
//!
//! A [`Host`] is the apply-time side of a log: it owns the files and decides
//! whether an action is legal. [`MemoryHost`] is a strict in-memory host,
//! used to realise logs in tests and to compare the effect of two logs.

use std::collections::BTreeMap;

use crate::errors::{Result, TreeLogError};
use crate::model::{Action, ActionKind, Content};

/// A file tree actions can be applied to
pub trait Host {
    fn exists(&self, path: &str) -> bool;

    fn read(&self, path: &str) -> Option<Content>;

    /// # Errors
    /// Fails if `path` already exists
    fn create(&mut self, path: &str, content: Content) -> Result<()>;

    /// # Errors
    /// Fails if `path` does not exist
    fn overwrite(&mut self, path: &str, content: Content) -> Result<()>;

    /// # Errors
    /// Fails if `from` does not exist or `to` already does
    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    /// # Errors
    /// Fails if `path` does not exist
    fn delete(&mut self, path: &str) -> Result<()>;

    /// Apply one action by dispatching on its kind
    ///
    /// # Errors
    /// Whatever the matching method returns
    fn apply(&mut self, action: &Action) -> Result<()> {
        let path = action.path();
        match action.kind() {
            ActionKind::Create { content } => self.create(path, content.clone()),
            ActionKind::Overwrite { content } => self.overwrite(path, content.clone()),
            ActionKind::Rename { to } => self.rename(path, to),
            ActionKind::Delete => self.delete(path),
        }
    }
}

/// Strict in-memory host
///
/// Paths are compared exactly; there are no directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHost {
    files: BTreeMap<String, Content>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host pre-populated with `files`
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<Content>,
    {
        Self {
            files: files
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in path order
    pub fn files(&self) -> impl Iterator<Item = (&str, &Content)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c))
    }

    fn require(&self, path: &str) -> Result<()> {
        if self.files.contains_key(path) {
            Ok(())
        } else {
            Err(TreeLogError::FileNotFound {
                path: path.to_string(),
            })
        }
    }

    fn require_absent(&self, path: &str) -> Result<()> {
        if self.files.contains_key(path) {
            Err(TreeLogError::FileAlreadyExists {
                path: path.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl Host for MemoryHost {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &str) -> Option<Content> {
        self.files.get(path).cloned()
    }

    fn create(&mut self, path: &str, content: Content) -> Result<()> {
        self.require_absent(path)?;
        self.files.insert(path.to_string(), content);
        Ok(())
    }

    fn overwrite(&mut self, path: &str, content: Content) -> Result<()> {
        self.require(path)?;
        self.files.insert(path.to_string(), content);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        self.require(from)?;
        if from == to {
            return Ok(());
        }
        self.require_absent(to)?;
        if let Some(content) = self.files.remove(from) {
            self.files.insert(to.to_string(), content);
        }
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| TreeLogError::FileNotFound {
                path: path.to_string(),
            })
    }
}
