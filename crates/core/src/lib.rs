//! Decor Core - status aggregation and tree decoration primitives
//!
//! This crate provides:
//! - Canonical path identifiers shared by changes and tree nodes
//! - Change records and the status priority order
//! - Ancestor aggregation into a dominant change map
//! - Decoration synthesis and mapping onto a live hierarchy

pub mod aggregate;
pub mod change;
pub mod decoration;
pub mod diagnostics;
pub mod mapper;
pub mod path;
pub mod status;
pub mod tree;

// Re-export main types for convenience
pub use aggregate::DominantChangeMap;
pub use change::ChangeRecord;
pub use decoration::{
    synthesize, CaptionPrefix, ColorClass, DecorationData, Emphasis, FontWeight, Marker,
};
pub use diagnostics::{
    CollectingDiagnostics, Diagnostic, Diagnostics, SilentDiagnostics, TracingDiagnostics,
};
pub use mapper::{collect_decorations, report_unhandled, DecorationMap};
pub use path::RepoPath;
pub use status::{compare, Status};
pub use tree::{FileTree, Hierarchy};

/// Common result type used throughout decor-core
pub type Result<T> = anyhow::Result<T>;

/// Aggregate `changes` below the tree root and decorate `tree` in one pass
pub fn decorate(
    tree: &dyn Hierarchy,
    changes: &[ChangeRecord],
    diagnostics: &dyn Diagnostics,
) -> DecorationMap {
    let Some(root) = tree.root() else {
        return DecorationMap::new();
    };
    collect_decorations(
        tree,
        &DominantChangeMap::from_changes_under(changes, root),
        diagnostics,
    )
}
