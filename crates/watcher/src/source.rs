//! Repository change source capability

use crate::dispose::Disposable;
use crate::event::Subscription;
use async_trait::async_trait;
use decor_core::{ChangeRecord, RepoPath};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A source-control repository, identified by its working-tree root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Repository {
    pub root: RepoPath,
}

impl Repository {
    pub fn new(root: impl Into<RepoPath>) -> Self {
        Self { root: root.into() }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

/// Complete list of changes in one repository at one point in time
///
/// Snapshots are never deltas: each one replaces the previous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSnapshot {
    pub repository: Repository,
    #[serde(default)]
    pub changes: Vec<ChangeRecord>,
}

impl ChangeSnapshot {
    pub fn new(repository: Repository, changes: Vec<ChangeRecord>) -> Self {
        Self {
            repository,
            changes,
        }
    }
}

/// Errors raised while binding a watcher to a repository
#[derive(Debug, Error)]
pub enum WatchError {
    /// Repository cannot be watched (missing, not a repository, ...)
    #[error("Repository not available: {0}")]
    Unavailable(Repository),

    /// The watcher backend failed
    #[error("Watcher for {repository} failed: {reason}")]
    Backend {
        repository: Repository,
        reason: String,
    },
}

pub type SnapshotListener = Box<dyn Fn(&ChangeSnapshot) + Send + Sync>;

/// Produces change snapshots for watched repositories
#[async_trait]
pub trait ChangeSource: Send + Sync {
    /// Start watching `repository`; watching stops when the handle is disposed
    async fn watch(&self, repository: &Repository) -> Result<Box<dyn Disposable>, WatchError>;

    /// Listen to snapshots of every watched repository
    fn on_change(&self, listener: SnapshotListener) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use decor_core::{decorate, CollectingDiagnostics, FileTree, Status};

    #[test]
    fn test_snapshot_wire_format() {
        let json = r#"{
            "repository": {"root": "/ws/project/"},
            "changes": [
                {"path": "/ws/project/src/main.rs", "status": "modified", "staged": true},
                {"path": "/ws/project/NEW.md", "status": "new"}
            ]
        }"#;

        let snapshot: ChangeSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.repository, Repository::new("/ws/project"));
        assert_eq!(
            snapshot.changes,
            vec![
                ChangeRecord::staged("/ws/project/src/main.rs", Status::Modified),
                ChangeRecord::new("/ws/project/NEW.md", Status::Added),
            ]
        );
    }

    #[test]
    fn test_unrecognized_status_keeps_the_rest_of_the_snapshot() {
        let json = r#"{
            "repository": {"root": "/ws"},
            "changes": [
                {"path": "/ws/src/main.rs", "status": "modified"},
                {"path": "/ws/build.log", "status": "ignored"}
            ]
        }"#;

        let snapshot: ChangeSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.changes.len(), 2);
        assert_eq!(snapshot.changes[1].status, Status::Unknown);

        let tree = FileTree::from_paths("/ws", ["/ws/src/main.rs", "/ws/build.log"]);
        let sink = CollectingDiagnostics::new();
        let decorations = decorate(&tree, &snapshot.changes, &sink);

        assert_eq!(decorations[&RepoPath::new("/ws/src/main.rs")].glyph(), Some("→"));
        assert!(decorations[&RepoPath::new("/ws/build.log")].is_empty());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.entries()[0].path, RepoPath::new("/ws/build.log"));
    }

    #[test]
    fn test_error_messages() {
        let repository = Repository::new("/ws/project");
        assert_eq!(
            WatchError::Unavailable(repository.clone()).to_string(),
            "Repository not available: /ws/project"
        );
        let backend = WatchError::Backend {
            repository,
            reason: "index locked".to_string(),
        };
        assert_eq!(backend.to_string(), "Watcher for /ws/project failed: index locked");
    }
}
