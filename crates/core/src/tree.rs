//! Hierarchy capability and an owned file tree implementing it

use crate::path::RepoPath;
use ahash::AHashMap;
use anyhow::{Context, Result};
use smallvec::SmallVec;
use std::path::Path;
use walkdir::WalkDir;

/// Read-only view of a file hierarchy
///
/// Node identity is the node's [`RepoPath`], the same identifier space as
/// change records.
pub trait Hierarchy {
    /// Root node, `None` while the tree has not been populated
    fn root(&self) -> Option<&RepoPath>;

    /// Direct children of `node`; empty for leaves and unknown nodes
    fn children(&self, node: &RepoPath) -> &[RepoPath];
}

/// In-memory file tree
///
/// Children are stored per directory in insertion order. SmallVec keeps the
/// common small directories off the heap.
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    root: Option<RepoPath>,
    children: AHashMap<RepoPath, SmallVec<[RepoPath; 4]>>,
}

impl FileTree {
    /// Tree without a root
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tree containing only its root
    pub fn new(root: impl Into<RepoPath>) -> Self {
        Self {
            root: Some(root.into()),
            children: AHashMap::new(),
        }
    }

    /// Build a tree from a root and a list of descendant paths
    ///
    /// Intermediate directories are created implicitly. Paths outside the
    /// root are skipped.
    pub fn from_paths<I, P>(root: impl Into<RepoPath>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<RepoPath>,
    {
        let mut tree = Self::new(root);
        for path in paths {
            tree.insert(path);
        }
        tree
    }

    /// Build a tree by scanning a directory on disk
    ///
    /// Node ids are the absolute paths of the entries. `.git` directories are
    /// skipped.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut tree = Self::new(RepoPath::from_fs_path(dir));

        for entry in WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
        {
            let entry = entry
                .with_context(|| format!("Failed to scan directory: {}", dir.display()))?;
            if entry.depth() == 0 {
                continue;
            }
            tree.insert(RepoPath::from_fs_path(entry.path()));
        }

        Ok(tree)
    }

    /// Insert a path and any missing intermediate directories
    ///
    /// Returns false if the tree has no root or the path lies outside it.
    pub fn insert(&mut self, path: impl Into<RepoPath>) -> bool {
        let path = path.into();
        let Some(root) = self.root.clone() else {
            return false;
        };
        if path == root {
            return true;
        }
        if !root.is_ancestor_of(&path) {
            tracing::debug!(path = %path, root = %root, "Skipping path outside tree root");
            return false;
        }

        let mut child = path;
        while let Some(parent) = child.parent() {
            let siblings = self.children.entry(parent.clone()).or_default();
            if siblings.contains(&child) {
                // The rest of the chain was linked when `child` was first added.
                break;
            }
            siblings.push(child);
            if parent == root {
                break;
            }
            child = parent;
        }
        true
    }

    /// True if `path` is the root or has been inserted
    pub fn contains(&self, path: &RepoPath) -> bool {
        match (&self.root, path.parent()) {
            (Some(root), _) if root == path => true,
            (_, Some(parent)) => self
                .children
                .get(&parent)
                .is_some_and(|siblings| siblings.contains(path)),
            _ => false,
        }
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        match self.root {
            Some(_) => 1 + self.children.values().map(|c| c.len()).sum::<usize>(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl Hierarchy for FileTree {
    fn root(&self) -> Option<&RepoPath> {
        self.root.as_ref()
    }

    fn children(&self, node: &RepoPath) -> &[RepoPath] {
        self.children
            .get(node)
            .map(|siblings| siblings.as_slice())
            .unwrap_or(&[])
    }
}
