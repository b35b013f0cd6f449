//! Presentation-agnostic decoration data

use crate::change::ChangeRecord;
use crate::diagnostics::Diagnostics;
use crate::status::Status;
use serde::Serialize;

/// Symbolic marker shown before a node caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    /// Modified, renamed or deleted content
    Changed,
    /// Added or copied, staged
    StagedAddition,
    /// Added or copied, not staged
    UnstagedAddition,
    /// Merge conflict
    Conflict,
}

impl Marker {
    pub const fn glyph(self) -> &'static str {
        match self {
            Marker::Changed => "→",
            Marker::StagedAddition => "＋",
            Marker::UnstagedAddition => "⋃",
            Marker::Conflict => "⇆",
        }
    }
}

/// Color class from the fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Warn,
    Success,
    Error,
}

impl ColorClass {
    pub const fn name(self) -> &'static str {
        match self {
            ColorClass::Warn => "warn",
            ColorClass::Success => "success",
            ColorClass::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Emphasis {
    pub color: ColorClass,
    pub weight: FontWeight,
}

impl Emphasis {
    pub const fn bold(color: ColorClass) -> Self {
        Self {
            color,
            weight: FontWeight::Bold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CaptionPrefix {
    pub marker: Marker,
    pub emphasis: Emphasis,
}

/// Decoration attached to a single tree node
///
/// An empty decoration (no caption prefix) is produced for statuses that have
/// no visual representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DecorationData {
    pub caption_prefix: Option<CaptionPrefix>,
}

impl DecorationData {
    pub const fn empty() -> Self {
        Self {
            caption_prefix: None,
        }
    }

    pub const fn prefixed(marker: Marker, emphasis: Emphasis) -> Self {
        Self {
            caption_prefix: Some(CaptionPrefix { marker, emphasis }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.caption_prefix.is_none()
    }

    pub fn marker(&self) -> Option<Marker> {
        self.caption_prefix.map(|prefix| prefix.marker)
    }

    /// Glyph of the marker, if any
    pub fn glyph(&self) -> Option<&'static str> {
        self.marker().map(Marker::glyph)
    }

    pub fn emphasis(&self) -> Option<Emphasis> {
        self.caption_prefix.map(|prefix| prefix.emphasis)
    }
}

/// Render a dominant change record as decoration data
pub fn synthesize(record: &ChangeRecord, diagnostics: &dyn Diagnostics) -> DecorationData {
    match record.status {
        // Deleted files are not in the tree; their directories show as changed.
        Status::Deleted | Status::Renamed | Status::Modified => {
            DecorationData::prefixed(Marker::Changed, Emphasis::bold(ColorClass::Warn))
        }
        Status::Copied | Status::Added => {
            let marker = if record.staged {
                Marker::StagedAddition
            } else {
                Marker::UnstagedAddition
            };
            DecorationData::prefixed(marker, Emphasis::bold(ColorClass::Success))
        }
        Status::Conflicted => {
            DecorationData::prefixed(Marker::Conflict, Emphasis::bold(ColorClass::Error))
        }
        Status::Untouched | Status::Unknown => {
            diagnostics.warn("Unhandled file change status", record);
            DecorationData::empty()
        }
    }
}
