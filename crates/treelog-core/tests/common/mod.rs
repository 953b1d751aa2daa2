use std::sync::Arc;

use treelog_core::{ActionKind, ActionLog, Content, IdAllocator, MemoryHost};

/// Create a log whose ids start at 1, independent of any other test
#[allow(dead_code)]
pub fn new_log() -> ActionLog {
    ActionLog::with_allocator(Arc::new(IdAllocator::new()))
}

/// Host pre-populated with files the logs under test did not create
#[allow(dead_code)]
pub fn seeded_host(paths: &[&str]) -> MemoryHost {
    MemoryHost::with_files(paths.iter().map(|p| (p.to_string(), "seed")))
}

/// The (path, kind) pairs of a log, ignoring ids
#[allow(dead_code)]
pub fn intents(log: &ActionLog) -> Vec<(String, ActionKind)> {
    log.iter()
        .map(|a| (a.path().to_string(), a.kind().clone()))
        .collect()
}

#[allow(dead_code)]
pub fn create(path: &str, text: &str) -> (String, ActionKind) {
    (
        path.to_string(),
        ActionKind::Create {
            content: Content::from(text),
        },
    )
}

#[allow(dead_code)]
pub fn overwrite(path: &str, text: &str) -> (String, ActionKind) {
    (
        path.to_string(),
        ActionKind::Overwrite {
            content: Content::from(text),
        },
    )
}

#[allow(dead_code)]
pub fn rename(path: &str, to: &str) -> (String, ActionKind) {
    (path.to_string(), ActionKind::Rename { to: to.to_string() })
}

#[allow(dead_code)]
pub fn delete(path: &str) -> (String, ActionKind) {
    (path.to_string(), ActionKind::Delete)
}
