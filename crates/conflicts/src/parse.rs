//! Git-style conflict marker parsing
//!
//! Produces line ranges for every section of every conflict block:
//! ```text
//! <<<<<<< HEAD          current marker
//! our lines             current content
//! ||||||| base          base marker (diff3 style, zero or more)
//! original lines        base content
//! =======
//! their lines           incoming content
//! >>>>>>> feature       incoming marker
//! ```

use serde::{Deserialize, Serialize};

/// Conflict marker strings (Git-compatible)
pub const CONFLICT_MARKER_START: &str = "<<<<<<<";
pub const CONFLICT_MARKER_BASE: &str = "|||||||";
pub const CONFLICT_MARKER_SEPARATOR: &str = "=======";
pub const CONFLICT_MARKER_END: &str = ">>>>>>>";

/// Zero-based line and character offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open text range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// One section of a conflict block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRegion {
    /// The marker line, if the section has one
    pub marker: Option<Range>,
    /// The lines between this section's marker and the next; `None` when empty
    pub content: Option<Range>,
}

/// A complete conflict block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflict {
    /// Whole block, start marker through end marker
    pub total: Range,
    pub current: ConflictRegion,
    pub bases: Vec<ConflictRegion>,
    pub incoming: ConflictRegion,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Current,
    Base,
    Incoming,
}

struct Block {
    start_line: u32,
    section: Section,
    section_start: u32,
    current: ConflictRegion,
    bases: Vec<ConflictRegion>,
    incoming: ConflictRegion,
}

/// Parse every terminated conflict block in `text`
///
/// A block without an end marker is ignored. A start marker inside an open
/// block abandons the open block. Lines past `u32::MAX` are not scanned, and
/// line lengths saturate at `u32::MAX`.
pub fn parse_conflicts(text: &str) -> Vec<MergeConflict> {
    let lines: Vec<&str> = text.lines().collect();
    let mut conflicts = Vec::new();
    let mut open: Option<Block> = None;

    for (line, idx) in lines.iter().zip(0..u32::MAX) {
        if line.starts_with(CONFLICT_MARKER_START) {
            open = Some(Block {
                start_line: idx,
                section: Section::Current,
                section_start: idx + 1,
                current: ConflictRegion {
                    marker: Some(line_range(&lines, idx)),
                    content: None,
                },
                bases: Vec::new(),
                incoming: ConflictRegion::default(),
            });
            continue;
        }

        let Some(block) = open.as_mut() else {
            continue;
        };

        if line.starts_with(CONFLICT_MARKER_BASE) && block.section != Section::Incoming {
            let content = content_range(&lines, block.section_start, idx);
            close_section(block, content);
            block.bases.push(ConflictRegion {
                marker: Some(line_range(&lines, idx)),
                content: None,
            });
            block.section = Section::Base;
            block.section_start = idx + 1;
        } else if line.starts_with(CONFLICT_MARKER_SEPARATOR) && block.section != Section::Incoming {
            let content = content_range(&lines, block.section_start, idx);
            close_section(block, content);
            block.section = Section::Incoming;
            block.section_start = idx + 1;
        } else if line.starts_with(CONFLICT_MARKER_END) && block.section == Section::Incoming {
            let mut block = match open.take() {
                Some(block) => block,
                None => continue,
            };
            block.incoming = ConflictRegion {
                marker: Some(line_range(&lines, idx)),
                content: content_range(&lines, block.section_start, idx),
            };
            conflicts.push(MergeConflict {
                total: Range::new(
                    Position::new(block.start_line, 0),
                    line_range(&lines, idx).end,
                ),
                current: block.current,
                bases: block.bases,
                incoming: block.incoming,
            });
        }
    }

    conflicts
}

/// Count terminated conflict blocks
pub fn count_conflicts(text: &str) -> usize {
    parse_conflicts(text).len()
}

fn close_section(block: &mut Block, content: Option<Range>) {
    match block.section {
        Section::Current => block.current.content = content,
        Section::Base => {
            if let Some(base) = block.bases.last_mut() {
                base.content = content;
            }
        }
        Section::Incoming => block.incoming.content = content,
    }
}

fn line_len(lines: &[&str], idx: u32) -> u32 {
    lines
        .get(idx as usize)
        .map(|line| saturating_u32(line.chars().count()))
        .unwrap_or(0)
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Range covering the whole of line `idx`
fn line_range(lines: &[&str], idx: u32) -> Range {
    Range::new(Position::new(idx, 0), Position::new(idx, line_len(lines, idx)))
}

/// Range covering lines `start..end`, `None` if empty
fn content_range(lines: &[&str], start: u32, end: u32) -> Option<Range> {
    if start >= end {
        return None;
    }
    let last = end - 1;
    Some(Range::new(
        Position::new(start, 0),
        Position::new(last, line_len(lines, last)),
    ))
}
