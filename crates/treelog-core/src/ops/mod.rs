pub mod action_log;
pub mod compaction;

pub use action_log::ActionLog;
pub use compaction::CompactionReport;
