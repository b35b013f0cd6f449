//! Editor range decorations for merge conflict blocks

use crate::parse::{parse_conflicts, MergeConflict, Range};
use anyhow::{Context, Result};
use decor_core::RepoPath;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Background color with alpha in hundredths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha_percent: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, alpha_percent: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha_percent,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            f32::from(self.alpha_percent) / 100.0
        )
    }
}

const CURRENT: (u8, u8, u8) = (0, 255, 0);
const BASE: (u8, u8, u8) = (125, 125, 125);
const INCOMING: (u8, u8, u8) = (0, 0, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverviewRulerLane {
    Left,
    Center,
    Right,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OverviewRuler {
    pub color: Rgba,
    pub lane: OverviewRulerLane,
}

/// Presentation of one decoration type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DecorationStyle {
    pub background: Rgba,
    pub whole_line: bool,
    pub overview_ruler: Option<OverviewRuler>,
}

/// The six decoration types applied to conflict blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConflictDecorationType {
    CurrentMarker,
    CurrentContent,
    BaseMarker,
    BaseContent,
    IncomingMarker,
    IncomingContent,
}

impl ConflictDecorationType {
    pub const ALL: [ConflictDecorationType; 6] = [
        ConflictDecorationType::CurrentMarker,
        ConflictDecorationType::CurrentContent,
        ConflictDecorationType::BaseMarker,
        ConflictDecorationType::BaseContent,
        ConflictDecorationType::IncomingMarker,
        ConflictDecorationType::IncomingContent,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ConflictDecorationType::CurrentMarker => "merge-conflict-current-marker",
            ConflictDecorationType::CurrentContent => "merge-conflict-current-content",
            ConflictDecorationType::BaseMarker => "merge-conflict-base-marker",
            ConflictDecorationType::BaseContent => "merge-conflict-base-content",
            ConflictDecorationType::IncomingMarker => "merge-conflict-incoming-marker",
            ConflictDecorationType::IncomingContent => "merge-conflict-incoming-content",
        }
    }

    pub fn style(self) -> DecorationStyle {
        let (r, g, b) = match self {
            ConflictDecorationType::CurrentMarker | ConflictDecorationType::CurrentContent => CURRENT,
            ConflictDecorationType::BaseMarker | ConflictDecorationType::BaseContent => BASE,
            ConflictDecorationType::IncomingMarker | ConflictDecorationType::IncomingContent => {
                INCOMING
            }
        };

        if self.is_marker() {
            DecorationStyle {
                background: Rgba::new(r, g, b, 10),
                whole_line: true,
                overview_ruler: None,
            }
        } else {
            DecorationStyle {
                background: Rgba::new(r, g, b, 30),
                whole_line: true,
                overview_ruler: Some(OverviewRuler {
                    color: Rgba::new(r, g, b, 30),
                    lane: OverviewRulerLane::Full,
                }),
            }
        }
    }

    pub fn is_marker(self) -> bool {
        matches!(
            self,
            ConflictDecorationType::CurrentMarker
                | ConflictDecorationType::BaseMarker
                | ConflictDecorationType::IncomingMarker
        )
    }
}

impl fmt::Display for ConflictDecorationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Every decoration type with its style, for registration with an editor
pub fn decoration_types() -> Vec<(ConflictDecorationType, DecorationStyle)> {
    ConflictDecorationType::ALL
        .iter()
        .map(|&ty| (ty, ty.style()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeDecoration {
    pub range: Range,
}

/// Editor-side sink for range decorations
///
/// Each call replaces every decoration of `ty` on `uri`.
pub trait EditorDecorations: Send + Sync {
    fn set_decorations(&self, uri: &RepoPath, ty: ConflictDecorationType, decorations: Vec<RangeDecoration>);
}

/// Conflicts detected in one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflictUpdate {
    pub uri: RepoPath,
    pub conflicts: Vec<MergeConflict>,
}

impl MergeConflictUpdate {
    pub fn new(uri: impl Into<RepoPath>, conflicts: Vec<MergeConflict>) -> Self {
        Self {
            uri: uri.into(),
            conflicts,
        }
    }

    /// Parse conflict markers out of a document's text
    pub fn from_text(uri: impl Into<RepoPath>, text: &str) -> Self {
        Self::new(uri, parse_conflicts(text))
    }

    /// Read a file from disk and parse its conflict markers
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::from_text(RepoPath::from_fs_path(path), &text))
    }
}

/// Translates conflict updates into editor decorations
pub struct MergeConflictDecorations<D> {
    editor: D,
}

impl<D: EditorDecorations> MergeConflictDecorations<D> {
    pub fn new(editor: D) -> Self {
        Self { editor }
    }

    pub fn editor(&self) -> &D {
        &self.editor
    }

    /// Replace every conflict decoration on the update's document
    ///
    /// Always issues one call per decoration type, so an update with no
    /// conflicts clears the document.
    pub fn on_merge_conflict_update(&self, update: &MergeConflictUpdate) {
        debug!(uri = %update.uri, conflicts = update.conflicts.len(), "Updating merge conflict decorations");

        let mut by_type: [Vec<RangeDecoration>; 6] = Default::default();
        for conflict in &update.conflicts {
            let regions = [
                (ConflictDecorationType::CurrentMarker, conflict.current.marker),
                (ConflictDecorationType::CurrentContent, conflict.current.content),
                (ConflictDecorationType::IncomingMarker, conflict.incoming.marker),
                (ConflictDecorationType::IncomingContent, conflict.incoming.content),
            ];
            let bases = conflict.bases.iter().flat_map(|base| {
                [
                    (ConflictDecorationType::BaseMarker, base.marker),
                    (ConflictDecorationType::BaseContent, base.content),
                ]
            });
            for (ty, range) in regions.into_iter().chain(bases) {
                if let Some(range) = range {
                    by_type[slot(ty)].push(RangeDecoration { range });
                }
            }
        }

        for ty in ConflictDecorationType::ALL {
            let decorations = std::mem::take(&mut by_type[slot(ty)]);
            self.editor.set_decorations(&update.uri, ty, decorations);
        }
    }
}

fn slot(ty: ConflictDecorationType) -> usize {
    ty as usize
}
