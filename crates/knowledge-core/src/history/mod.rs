//! Version-control history as an optional collaborator.
//!
//! A lookup that cannot be answered (no repository, untracked path, Git
//! error) returns `None`, which callers treat as "no signal".

pub mod git;

use std::path::Path;

use chrono::{DateTime, FixedOffset};

pub use git::GitHistory;

pub trait ChangeHistory {
    /// Author time of the most recent commit that touched `path`
    /// (relative to the project root).
    fn last_change(&self, path: &str) -> Option<DateTime<FixedOffset>>;
}

/// History source used when the project is not inside a Git repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl ChangeHistory for NoHistory {
    fn last_change(&self, _path: &str) -> Option<DateTime<FixedOffset>> {
        None
    }
}

/// Git history for the project when available, `NoHistory` otherwise.
pub fn open_history(project_root: &Path) -> Box<dyn ChangeHistory> {
    match GitHistory::discover(project_root) {
        Ok(history) => Box::new(history),
        Err(e) => {
            tracing::debug!("No Git history available, modification checks skipped: {e}");
            Box::new(NoHistory)
        }
    }
}
