//! Canonical path identifiers shared by change records and tree nodes

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Normalized, `/`-separated path identifier
///
/// Parsing collapses redundant separators, `.` segments and trailing slashes,
/// so raw strings that name the same location compare equal. A path is either
/// relative (root is `""`), absolute (root is `"/"`) or drive-prefixed (root
/// is e.g. `"C:/"`). Node identity in a [`Hierarchy`](crate::Hierarchy) uses
/// the same type.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RepoPath {
    repr: String,
    /// Length of the root prefix inside `repr` (0, 1 or 3)
    root_len: usize,
}

impl RepoPath {
    /// Parse and normalize a raw path string
    pub fn new(raw: &str) -> Self {
        let raw = raw.replace('\\', "/");
        let mut rest = raw.as_str();
        let mut repr = String::with_capacity(raw.len());

        if is_drive_prefix(rest) {
            repr.push_str(&rest[..2]);
            repr.push('/');
            rest = &rest[2..];
        } else if rest.starts_with('/') {
            repr.push('/');
        }
        let root_len = repr.len();

        let mut segments: Vec<&str> = Vec::new();
        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        repr.push_str(&segments.join("/"));

        Self { repr, root_len }
    }

    /// The relative root (`""`)
    pub fn root() -> Self {
        Self {
            repr: String::new(),
            root_len: 0,
        }
    }

    /// Build from a filesystem path (lossy for non-UTF-8 names)
    pub fn from_fs_path(path: &Path) -> Self {
        Self::new(&path.to_string_lossy())
    }

    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// True for `""`, `"/"` and drive roots
    pub fn is_root(&self) -> bool {
        self.repr.len() == self.root_len
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.relative().split('/').count()
        }
    }

    /// Last segment, `None` for a root
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.relative().rsplit('/').next()
    }

    /// Parent path; the parent of a top-level entry is its root, a root has none
    pub fn parent(&self) -> Option<RepoPath> {
        if self.is_root() {
            return None;
        }
        let cut = match self.relative().rfind('/') {
            Some(idx) => self.root_len + idx,
            None => self.root_len,
        };
        Some(Self {
            repr: self.repr[..cut].to_string(),
            root_len: self.root_len,
        })
    }

    /// Strict ancestors, nearest first, never including the root
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            path: self,
            end: self.repr.len(),
        }
    }

    /// Append a single segment (or a relative sub-path)
    pub fn join(&self, child: &str) -> RepoPath {
        if self.is_root() {
            Self::new(&format!("{}{}", self.repr, child))
        } else {
            Self::new(&format!("{}/{}", self.repr, child))
        }
    }

    /// True if `self` is a strict ancestor of `other`
    pub fn is_ancestor_of(&self, other: &RepoPath) -> bool {
        if self.is_root() {
            return !other.is_root() && other.root_str() == self.repr;
        }
        other.repr.len() > self.repr.len()
            && other.repr.starts_with(&self.repr)
            && other.repr.as_bytes()[self.repr.len()] == b'/'
    }

    fn root_str(&self) -> &str {
        &self.repr[..self.root_len]
    }

    fn relative(&self) -> &str {
        &self.repr[self.root_len..]
    }
}

fn is_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/')
}

/// Iterator over the strict, non-root ancestors of a [`RepoPath`]
pub struct Ancestors<'a> {
    path: &'a RepoPath,
    /// End (exclusive) of the last yielded path inside `repr`
    end: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = RepoPath;

    fn next(&mut self) -> Option<RepoPath> {
        let root_len = self.path.root_len;
        if self.end <= root_len {
            return None;
        }
        let idx = self.path.repr[root_len..self.end].rfind('/')?;
        self.end = root_len + idx;
        Some(RepoPath {
            repr: self.path.repr[..self.end].to_string(),
            root_len,
        })
    }
}

// Equality, ordering and hashing only look at `repr`; `root_len` is derived
// from it. This keeps `Borrow<str>` lookups consistent.

impl PartialEq for RepoPath {
    fn eq(&self, other: &Self) -> bool {
        self.repr == other.repr
    }
}

impl Eq for RepoPath {}

impl PartialOrd for RepoPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RepoPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.repr.cmp(&other.repr)
    }
}

impl Hash for RepoPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.repr.hash(state);
    }
}

impl Borrow<str> for RepoPath {
    fn borrow(&self) -> &str {
        &self.repr
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.repr
    }
}

impl From<&str> for RepoPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for RepoPath {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&RepoPath> for RepoPath {
    fn from(path: &RepoPath) -> Self {
        path.clone()
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.repr
    }
}

impl fmt::Debug for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepoPath({:?})", self.repr)
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}
