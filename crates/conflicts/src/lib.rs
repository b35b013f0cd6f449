//! Merge conflict editor decorations
//!
//! This crate provides:
//! - Parsing of Git conflict markers into line ranges
//! - The six conflict decoration types and their styles
//! - Fan-out of a conflict update into per-type editor decorations

pub mod decorations;
pub mod parse;

pub use decorations::{
    decoration_types, ConflictDecorationType, DecorationStyle, EditorDecorations,
    MergeConflictDecorations, MergeConflictUpdate, OverviewRuler, OverviewRulerLane,
    RangeDecoration, Rgba,
};
pub use parse::{count_conflicts, parse_conflicts, ConflictRegion, MergeConflict, Position, Range};
