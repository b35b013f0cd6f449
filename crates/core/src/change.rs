//! Change records reported by the source-control watcher

use crate::path::RepoPath;
use crate::status::Status;
use serde::{Deserialize, Serialize};

/// Status of one path in a repository snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Normalized path, same identifier space as tree nodes
    pub path: RepoPath,
    /// Kind of change
    pub status: Status,
    /// Whether the change is in the index
    #[serde(default)]
    pub staged: bool,
}

impl ChangeRecord {
    /// Create an unstaged record
    pub fn new(path: impl Into<RepoPath>, status: Status) -> Self {
        Self {
            path: path.into(),
            status,
            staged: false,
        }
    }

    /// Create a staged record
    pub fn staged(path: impl Into<RepoPath>, status: Status) -> Self {
        Self {
            path: path.into(),
            status,
            staged: true,
        }
    }

    /// Same status and staged flag, attributed to another path
    pub(crate) fn attributed_to(&self, path: RepoPath) -> Self {
        Self {
            path,
            status: self.status,
            staged: self.staged,
        }
    }
}
