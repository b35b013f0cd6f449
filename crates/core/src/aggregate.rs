//! Ancestor aggregation: one dominant change record per affected path
//!
//! Every reported (leaf) path keeps its own record. Every directory strictly
//! between a leaf and the root receives a synthesized record carrying the
//! highest-priority status among its changed descendants. The root is either
//! the filesystem root or, with [`DominantChangeMap::from_changes_under`], a
//! workspace root.

use crate::change::ChangeRecord;
use crate::path::RepoPath;
use crate::status::compare;
use std::cmp::Ordering;
use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

#[derive(Clone, Copy)]
enum Propagation<'a> {
    None,
    ToRoot,
    Below(&'a RepoPath),
}

/// Mapping from every affected path to its dominant change record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DominantChangeMap {
    entries: BTreeMap<RepoPath, ChangeRecord>,
}

impl DominantChangeMap {
    /// Aggregate a full change snapshot, propagating to ancestor directories
    pub fn from_changes(changes: &[ChangeRecord]) -> Self {
        Self::build(changes, Propagation::ToRoot)
    }

    /// Aggregate a snapshot, propagating only to directories strictly below
    /// `root`
    ///
    /// `root` itself never receives a synthesized record.
    pub fn from_changes_under(changes: &[ChangeRecord], root: &RepoPath) -> Self {
        Self::build(changes, Propagation::Below(root))
    }

    /// Only the reported paths, without ancestor entries
    pub fn leaves_only(changes: &[ChangeRecord]) -> Self {
        Self::build(changes, Propagation::None)
    }

    fn build(changes: &[ChangeRecord], propagation: Propagation<'_>) -> Self {
        // Keyed by canonical path; a later duplicate replaces an earlier one.
        let leaves: BTreeMap<&RepoPath, &ChangeRecord> =
            changes.iter().map(|change| (&change.path, change)).collect();

        let mut entries: BTreeMap<RepoPath, ChangeRecord> = leaves
            .iter()
            .map(|(path, change)| ((*path).clone(), (*change).clone()))
            .collect();

        if !matches!(propagation, Propagation::None) {
            // Leaves are visited in path order and every ancestor chain is
            // walked to the top, so the result does not depend on input order.
            for change in leaves.values() {
                for ancestor in change.path.ancestors() {
                    if let Propagation::Below(root) = propagation {
                        if !root.is_ancestor_of(&ancestor) {
                            break;
                        }
                    }
                    match entries.entry(ancestor) {
                        Entry::Vacant(slot) => {
                            let path = slot.key().clone();
                            slot.insert(change.attributed_to(path));
                        }
                        Entry::Occupied(mut slot) => {
                            if leaves.contains_key(slot.key()) {
                                // Reported paths keep their own record.
                                continue;
                            }
                            if compare(change.status, slot.get().status) == Ordering::Greater {
                                let path = slot.key().clone();
                                slot.insert(change.attributed_to(path));
                            }
                        }
                    }
                }
            }
        }

        Self { entries }
    }

    /// Dominant record for a path
    pub fn get(&self, path: &RepoPath) -> Option<&ChangeRecord> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &RepoPath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order
    pub fn iter(&self) -> btree_map::Iter<'_, RepoPath, ChangeRecord> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a DominantChangeMap {
    type Item = (&'a RepoPath, &'a ChangeRecord);
    type IntoIter = btree_map::Iter<'a, RepoPath, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeSet;

    fn status_at(map: &DominantChangeMap, path: &str) -> Option<Status> {
        map.get(&RepoPath::new(path)).map(|record| record.status)
    }

    #[test]
    fn test_single_nested_change_propagates_to_every_ancestor() {
        let map = DominantChangeMap::from_changes(&[ChangeRecord::new(
            "a/b/c.txt",
            Status::Modified,
        )]);

        assert_eq!(map.len(), 3);
        assert_eq!(status_at(&map, "a/b/c.txt"), Some(Status::Modified));
        assert_eq!(status_at(&map, "a/b"), Some(Status::Modified));
        assert_eq!(status_at(&map, "a"), Some(Status::Modified));
        assert!(!map.contains(&RepoPath::root()));
    }

    #[test]
    fn test_conflict_outranks_modification_on_shared_ancestors() {
        let modified = ChangeRecord::new("a/b/c.txt", Status::Modified);
        let conflicted = ChangeRecord::new("a/b/d.txt", Status::Conflicted);
        let map = DominantChangeMap::from_changes(&[modified.clone(), conflicted.clone()]);

        assert_eq!(status_at(&map, "a/b"), Some(Status::Conflicted));
        assert_eq!(status_at(&map, "a"), Some(Status::Conflicted));
        assert_eq!(map.get(&modified.path), Some(&modified));
        assert_eq!(map.get(&conflicted.path), Some(&conflicted));
    }

    #[test]
    fn test_ancestor_record_uses_its_own_path_and_winner_staged_flag() {
        let map = DominantChangeMap::from_changes(&[
            ChangeRecord::new("a/x.txt", Status::Added),
            ChangeRecord::staged("a/y.txt", Status::Deleted),
        ]);

        let ancestor = map.get(&RepoPath::new("a")).unwrap();
        assert_eq!(ancestor, &ChangeRecord::staged("a", Status::Deleted));
    }

    #[test]
    fn test_equal_status_keeps_first_leaf_in_path_order() {
        let changes = [
            ChangeRecord::new("a/z.txt", Status::Added),
            ChangeRecord::staged("a/m.txt", Status::Added),
        ];
        let map = DominantChangeMap::from_changes(&changes);

        // "a/m.txt" sorts first, so its staged flag wins the tie.
        assert_eq!(map.get(&RepoPath::new("a")), Some(&ChangeRecord::staged("a", Status::Added)));

        let mut reversed = changes.to_vec();
        reversed.reverse();
        assert_eq!(DominantChangeMap::from_changes(&reversed), map);
    }

    #[test]
    fn test_low_priority_branch_does_not_stop_a_later_upgrade() {
        // The deep added file reaches "a" first; the conflict must still
        // climb past "a/b" and upgrade "a".
        let map = DominantChangeMap::from_changes(&[
            ChangeRecord::new("a/b/c/d.txt", Status::Added),
            ChangeRecord::new("a/b/e.txt", Status::Modified),
            ChangeRecord::new("a/f.txt", Status::Conflicted),
        ]);

        assert_eq!(status_at(&map, "a/b/c"), Some(Status::Added));
        assert_eq!(status_at(&map, "a/b"), Some(Status::Modified));
        assert_eq!(status_at(&map, "a"), Some(Status::Conflicted));
    }

    #[test]
    fn test_reported_directory_keeps_its_record() {
        let directory = ChangeRecord::new("vendor/lib", Status::Added);
        let map = DominantChangeMap::from_changes(&[
            directory.clone(),
            ChangeRecord::new("vendor/lib/file.c", Status::Conflicted),
        ]);

        assert_eq!(map.get(&directory.path), Some(&directory));
        assert_eq!(status_at(&map, "vendor"), Some(Status::Conflicted));
    }

    #[test]
    fn test_top_level_leaf_creates_no_ancestors() {
        let map = DominantChangeMap::from_changes(&[ChangeRecord::new("x.txt", Status::Deleted)]);
        assert_eq!(map.len(), 1);

        let map = DominantChangeMap::from_changes(&[ChangeRecord::new("/x.txt", Status::Deleted)]);
        assert_eq!(map.len(), 1);
        assert!(!map.contains(&RepoPath::new("/")));
    }

    #[test]
    fn test_empty_input() {
        assert!(DominantChangeMap::from_changes(&[]).is_empty());
    }

    #[test]
    fn test_duplicate_paths_last_one_materializes() {
        let map = DominantChangeMap::from_changes(&[
            ChangeRecord::new("a/b.txt", Status::Conflicted),
            ChangeRecord::new("a//b.txt", Status::Added),
        ]);

        assert_eq!(status_at(&map, "a/b.txt"), Some(Status::Added));
        assert_eq!(status_at(&map, "a"), Some(Status::Added));
    }

    #[test]
    fn test_workspace_root_gets_no_synthesized_record() {
        let root = RepoPath::new("/ws");
        let map = DominantChangeMap::from_changes_under(
            &[
                ChangeRecord::new("/ws/a/b/c.txt", Status::Modified),
                ChangeRecord::new("/ws/d.txt", Status::Conflicted),
            ],
            &root,
        );

        assert!(!map.contains(&root));
        assert!(!map.contains(&RepoPath::new("/")));
        assert_eq!(status_at(&map, "/ws/a/b"), Some(Status::Modified));
        assert_eq!(status_at(&map, "/ws/a"), Some(Status::Modified));
        assert_eq!(map.len(), 4);

        // Unbounded aggregation climbs through the workspace root.
        let unbounded =
            DominantChangeMap::from_changes(&[ChangeRecord::new("/ws/a/b/c.txt", Status::Modified)]);
        assert!(unbounded.contains(&root));
    }

    #[test]
    fn test_leaves_outside_workspace_root_keep_only_their_own_record() {
        let root = RepoPath::new("/ws");
        let outside = ChangeRecord::new("/other/x.txt", Status::Added);
        let map = DominantChangeMap::from_changes_under(&[outside.clone()], &root);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&outside.path), Some(&outside));
    }

    #[test]
    fn test_leaves_only_skips_ancestors() {
        let map = DominantChangeMap::leaves_only(&[ChangeRecord::new("a/b/c.txt", Status::Modified)]);
        assert_eq!(map.len(), 1);
        assert!(!map.contains(&RepoPath::new("a")));
    }

    fn random_changes(rng: &mut ChaCha8Rng) -> Vec<ChangeRecord> {
        const SEGMENTS: [&str; 4] = ["a", "b", "c", "d"];
        let count = rng.gen_range(0..24);
        let mut seen = BTreeSet::new();
        let mut changes = Vec::new();

        for _ in 0..count {
            let depth = rng.gen_range(1..5);
            let path = (0..depth)
                .map(|_| SEGMENTS[rng.gen_range(0..SEGMENTS.len())])
                .collect::<Vec<_>>()
                .join("/");
            if !seen.insert(path.clone()) {
                continue;
            }
            let status = Status::ALL[rng.gen_range(0..Status::ALL.len())];
            let mut change = ChangeRecord::new(path.as_str(), status);
            change.staged = rng.gen_bool(0.5);
            changes.push(change);
        }
        changes
    }

    #[test]
    fn test_randomized_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let changes = random_changes(&mut rng);
            let map = DominantChangeMap::from_changes(&changes);

            // Idempotence
            assert_eq!(DominantChangeMap::from_changes(&changes), map);

            // Order independence
            let mut shuffled = changes.clone();
            shuffled.shuffle(&mut rng);
            assert_eq!(DominantChangeMap::from_changes(&shuffled), map);

            // Leaf fidelity
            for change in &changes {
                assert_eq!(map.get(&change.path), Some(change));
            }

            // Root exclusion
            assert!(!map.contains(&RepoPath::root()));

            // Ancestor entries carry exactly the maximum descendant status
            let leaves: BTreeSet<&RepoPath> = changes.iter().map(|c| &c.path).collect();
            for (path, record) in &map {
                assert_eq!(&record.path, path);
                if leaves.contains(path) {
                    continue;
                }
                let max = changes
                    .iter()
                    .filter(|c| path.is_ancestor_of(&c.path))
                    .map(|c| c.status)
                    .max()
                    .expect("ancestor entry without descendants");
                assert_eq!(record.status, max, "ancestor {path}");
            }

            // Every ancestor of every leaf is present
            for change in &changes {
                for ancestor in change.path.ancestors() {
                    assert!(map.contains(&ancestor), "missing {ancestor}");
                }
            }
        }
    }
}
