//! Bounded rendering of a (filtered) diff.
//!
//! Produces two parallel outputs from one pass: an annotated block report
//! (`text`) and a compact line-numbered diff (`diff_text`) whose prefix
//! characters a terminal consumer can map to colors. Output is bounded by
//! line and hunk budgets; when the budgets cut a pure-addition file short,
//! the result carries follow-up line ranges that would retrieve the
//! omitted content.

use std::collections::BTreeMap;

use crate::anchor::{DiffSide, build_link, hunk_target};
use crate::diff::{Diff, DiffFile, DiffHunk, LineKind, is_addition, is_removal};

/// Sentinel shown when filtering removed everything.
pub const NO_OUTPUT_MESSAGE: &str = "No diff output (filters removed all hunks).";

/// Marker line reserved at the end of a partially shown hunk.
const TRUNCATION_SUFFIX: &str = "... (truncated)";

/// Trailing note appended once whenever output was cut.
const TRUNCATION_NOTE: &str =
    "Output truncated. Do not re-display this diff; narrow it with path, grep, or line-range filters instead.";

/// Options controlling rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Base URL of the hosted review; enables `GitHub:` deep-link lines
    pub base_url: Option<String>,
    /// Budget for total emitted block content lines
    pub max_lines: usize,
    /// Budget for rendered hunks (partial hunks count)
    pub max_hunks: usize,
}

/// Counters and follow-up hints describing what a render call emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderInfo {
    /// Files that contributed at least one block
    pub shown_files: usize,
    pub shown_hunks: usize,
    pub shown_lines: usize,
    pub truncated: bool,
    /// Per new-file path, `start-end` line ranges that would retrieve the
    /// content the budgets cut off
    pub suggested_ranges: BTreeMap<String, Vec<String>>,
}

/// The two rendered outputs plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Annotated block report for direct display
    pub text: String,
    /// Compact prefix+line-number diff for colorized terminal rendering
    pub diff_text: String,
    pub info: RenderInfo,
}

/// Render the diff within the given budgets. Rendering cannot fail; the
/// worst case is an empty or minimal output.
pub fn render(diff: &Diff, opts: &RenderOptions) -> Rendered {
    if diff.files.is_empty() {
        return Rendered {
            text: NO_OUTPUT_MESSAGE.to_string(),
            diff_text: String::new(),
            info: RenderInfo::default(),
        };
    }

    let mut blocks: Vec<String> = Vec::new();
    let mut diff_out = String::new();
    let mut info = RenderInfo::default();
    // First file whose rendering was cut short, for suggested ranges
    let mut cut_from: Option<usize> = None;

    'files: for (idx, file) in diff.files.iter().enumerate() {
        if info.shown_lines >= opts.max_lines || info.shown_hunks >= opts.max_hunks {
            info.truncated = true;
            cut_from.get_or_insert(idx);
            break;
        }

        if file.hunks.is_empty() {
            // Pure rename/mode-change/binary notice: header lines verbatim,
            // consuming a file slot but no hunk slot.
            let mut block_lines: Vec<String> = Vec::with_capacity(file.header_lines.len() + 2);
            block_lines.push(format!("== {}", file.path));
            block_lines.extend(file.header_lines.iter().cloned());
            if let Some(base) = &opts.base_url {
                block_lines.push(format!(
                    "GitHub: {}",
                    build_link(base, &file.path, None, DiffSide::Right)
                ));
            }
            blocks.push(block_lines.join("\n"));
            info.shown_lines += file.header_lines.len();
            info.shown_files += 1;
            continue;
        }

        let mut hunks_rendered_here = 0usize;
        for hunk in &file.hunks {
            if info.shown_lines >= opts.max_lines || info.shown_hunks >= opts.max_hunks {
                info.truncated = true;
                cut_from.get_or_insert(idx);
                break 'files;
            }

            let remaining = opts.max_lines - info.shown_lines;
            let (shown, partial) = if hunk.lines.len() > remaining {
                // Reserve one line for the truncation marker
                (&hunk.lines[..remaining - 1], true)
            } else {
                (&hunk.lines[..], false)
            };

            let mut block_lines: Vec<String> = Vec::with_capacity(shown.len() + 3);
            block_lines.push(format!("== {} (hunk +{})", file.path, hunk.new_start));
            block_lines.extend(shown.iter().cloned());
            if partial {
                block_lines.push(TRUNCATION_SUFFIX.to_string());
            }
            if let Some(base) = &opts.base_url {
                let target = hunk_target(hunk);
                block_lines.push(format!(
                    "GitHub: {}",
                    build_link(base, &file.path, Some(target.line), target.side)
                ));
            }
            blocks.push(block_lines.join("\n"));

            if hunks_rendered_here == 0 {
                diff_out.push_str(&format!("  {}\n", file.path));
                info.shown_files += 1;
            } else {
                diff_out.push('\n');
            }
            append_numbered(&mut diff_out, hunk, shown);

            info.shown_lines += shown.len() + usize::from(partial);
            info.shown_hunks += 1;
            hunks_rendered_here += 1;

            if partial {
                info.truncated = true;
                cut_from.get_or_insert(idx);
            }
        }
    }

    if info.truncated {
        if let Some(start) = cut_from {
            for file in &diff.files[start..] {
                if !file.is_new_file() {
                    continue;
                }
                if let Some((min, max)) = new_side_bounds(file) {
                    info.suggested_ranges
                        .insert(file.path.clone(), chunk_ranges(min, max, opts.max_lines));
                }
            }
        }
    }

    let mut text = blocks.join("\n\n");
    if info.truncated {
        text.push_str("\n\n");
        text.push_str(TRUNCATION_NOTE);
        if !info.suggested_ranges.is_empty() {
            text.push_str("\nSuggested --lines values:");
            for (path, ranges) in &info.suggested_ranges {
                text.push_str(&format!("\n{}: {}", path, ranges.join(", ")));
            }
        }
    }

    Rendered {
        text,
        diff_text: diff_out,
        info,
    }
}

/// Append `shown` body lines as `<prefix><line-number> <content>` rows,
/// numbering with the same counters the hunk replay uses. Truncation only
/// cuts the tail, so walking the shown prefix keeps the numbers accurate.
fn append_numbered(out: &mut String, hunk: &DiffHunk, shown: &[String]) {
    let mut old = hunk.old_start;
    let mut new = hunk.new_start;

    for raw in shown.iter().skip(1) {
        if is_addition(raw) {
            out.push_str(&format!("+{} {}\n", new, &raw[1..]));
            new += 1;
        } else if is_removal(raw) {
            out.push_str(&format!("-{} {}\n", old, &raw[1..]));
            old += 1;
        } else {
            let content = raw.strip_prefix(' ').unwrap_or(raw);
            out.push_str(&format!(" {} {}\n", new, content));
            old += 1;
            new += 1;
        }
    }
}

/// Min/max new-side line numbers across a file's hunks, counting added
/// and context lines only.
fn new_side_bounds(file: &DiffFile) -> Option<(u32, u32)> {
    let mut bounds: Option<(u32, u32)> = None;
    for hunk in &file.hunks {
        for line in hunk.numbered_body() {
            if matches!(line.kind, LineKind::Addition | LineKind::Context) {
                bounds = Some(match bounds {
                    Some((min, max)) => (min.min(line.new_line), max.max(line.new_line)),
                    None => (line.new_line, line.new_line),
                });
            }
        }
    }
    bounds
}

/// Split `min..=max` into contiguous `start-end` chunks of `size` lines.
fn chunk_ranges(min: u32, max: u32, size: usize) -> Vec<String> {
    let size = (size.max(1)) as u32;
    let mut ranges = Vec::new();
    let mut start = min;
    while start <= max {
        let end = start.saturating_add(size - 1).min(max);
        ranges.push(format!("{}-{}", start, end));
        if end == u32::MAX {
            break;
        }
        start = end + 1;
    }
    ranges
}
