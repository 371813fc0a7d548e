//! Stable anchors and deep links into a hosted diff view.
//!
//! Hosted viewers identify each file's section of a diff page by the
//! SHA-256 of its path; a line suffix like `R42` or `L17` scrolls to one
//! side of a specific row. Reproducing that derivation exactly is what
//! makes generated links resolve.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::diff::{DiffHunk, LineKind};

/// Which side of the diff a line number refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// Old-file line number
    Left,
    /// New-file line number
    Right,
}

impl fmt::Display for DiffSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffSide::Left => write!(f, "L"),
            DiffSide::Right => write!(f, "R"),
        }
    }
}

/// The line a hunk's link should land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkTarget {
    pub line: u32,
    pub side: DiffSide,
}

/// Per-file anchor: full lowercase-hex SHA-256 of the UTF-8 path.
pub fn file_anchor(path: &str) -> String {
    format!("{:x}", Sha256::digest(path.as_bytes()))
}

/// Pick the most useful line to link to in a hunk.
///
/// The first addition wins (new side), then the first removal (old side);
/// a hunk with neither falls back to its new-side start.
pub fn hunk_target(hunk: &DiffHunk) -> HunkTarget {
    let numbered = hunk.numbered_body();

    if let Some(line) = numbered.iter().find(|l| l.kind == LineKind::Addition) {
        return HunkTarget {
            line: line.new_line,
            side: DiffSide::Right,
        };
    }
    if let Some(line) = numbered.iter().find(|l| l.kind == LineKind::Removal) {
        return HunkTarget {
            line: line.old_line,
            side: DiffSide::Left,
        };
    }
    HunkTarget {
        line: hunk.new_start,
        side: DiffSide::Right,
    }
}

/// Build a deep link to one file's diff section, optionally pinned to a
/// line. Zero line numbers (from unparsable hunk headers) are left off.
pub fn build_link(base_url: &str, path: &str, line: Option<u32>, side: DiffSide) -> String {
    let base = base_url.trim_end_matches('/');
    let mut link = format!("{}/changes#diff-{}", base, file_anchor(path));
    if let Some(line) = line {
        if line > 0 {
            link.push_str(&format!("{}{}", side, line));
        }
    }
    link
}
