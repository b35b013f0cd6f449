//! Mapping dominant change records onto the nodes of a live hierarchy

use crate::aggregate::DominantChangeMap;
use crate::decoration::{synthesize, DecorationData};
use crate::diagnostics::Diagnostics;
use crate::path::RepoPath;
use crate::tree::Hierarchy;
use std::collections::BTreeMap;

/// Decorations keyed by node id; nodes without an entry are undecorated
pub type DecorationMap = BTreeMap<RepoPath, DecorationData>;

/// Walk `tree` from its root and decorate every node found in `changes`
///
/// The root node itself is never decorated. Paths in `changes` without a
/// live node are dropped. A tree without a root yields an empty map.
pub fn collect_decorations(
    tree: &dyn Hierarchy,
    changes: &DominantChangeMap,
    diagnostics: &dyn Diagnostics,
) -> DecorationMap {
    let mut result = DecorationMap::new();
    let Some(root) = tree.root() else {
        return result;
    };
    if changes.is_empty() {
        return result;
    }

    let mut stack: Vec<&RepoPath> = tree.children(root).iter().rev().collect();
    while let Some(node) = stack.pop() {
        if let Some(record) = changes.get(node) {
            result.insert(node.clone(), synthesize(record, diagnostics));
        }
        stack.extend(tree.children(node).iter().rev());
    }
    result
}

/// Warn once for every record in `changes` that has no decoration
///
/// Returns the number of records reported.
pub fn report_unhandled(changes: &DominantChangeMap, diagnostics: &dyn Diagnostics) -> usize {
    changes
        .iter()
        .filter(|(_, record)| synthesize(record, diagnostics).is_empty())
        .count()
}
