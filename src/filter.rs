//! Compositional narrowing of a parsed diff.
//!
//! Filters apply in a fixed order: path prefixes, then the new-file line
//! range, then the regex match. The range slice must run before the regex
//! stage so that grep context expansion operates on the already-narrowed
//! line set.
//!
//! Filtering is pure: the input diff is never mutated and the same options
//! applied twice yield an identical result.

use regex::Regex;

use crate::diff::{Diff, DiffFile, DiffHunk, LineKind};

/// Inclusive, 1-based range of new-file line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn contains(&self, line: u32) -> bool {
        line >= self.start && line <= self.end
    }
}

/// Options controlling which parts of a diff survive filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Path prefixes; a file survives if its path equals a prefix or lives
    /// under it (`src/a` matches `src/a/b.ts`, not `src/a.ts`)
    pub paths: Vec<String>,
    /// Regex applied per hunk line; hunks with no match are dropped.
    /// Invalid patterns degrade to a literal substring match.
    pub grep: Option<String>,
    /// Context lines kept around each grep match (0 keeps matching hunks
    /// whole)
    pub grep_context: usize,
    /// New-file line range to slice each hunk down to
    pub line_range: Option<LineRange>,
}

/// Apply all configured filters, producing a reduced copy of the diff.
pub fn filter(diff: &Diff, opts: &FilterOptions) -> Diff {
    let grep = opts.grep.as_deref().and_then(compile_grep);

    let files = diff
        .files
        .iter()
        .filter_map(|file| filter_file(file, opts, grep.as_ref()))
        .collect();

    Diff { files }
}

fn filter_file(file: &DiffFile, opts: &FilterOptions, grep: Option<&Regex>) -> Option<DiffFile> {
    if !opts.paths.is_empty() && !opts.paths.iter().any(|p| path_matches(&file.path, p)) {
        return None;
    }

    if file.hunks.is_empty() {
        // Header-only entries (pure renames, mode changes) have no content
        // for a grep to match, so an active grep drops them.
        return if grep.is_some() {
            None
        } else {
            Some(file.clone())
        };
    }

    let hunks: Vec<DiffHunk> = file
        .hunks
        .iter()
        .filter_map(|hunk| match opts.line_range {
            Some(range) => slice_to_range(hunk, range),
            None => Some(hunk.clone()),
        })
        .filter_map(|hunk| match grep {
            Some(re) => grep_hunk(&hunk, re, opts.grep_context),
            None => Some(hunk),
        })
        .collect();

    if hunks.is_empty() {
        return None;
    }

    Some(DiffFile {
        path: file.path.clone(),
        header_lines: file.header_lines.clone(),
        hunks,
    })
}

/// Prefix match on whole path components: equal, or `prefix + "/"`.
fn path_matches(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Keep only body lines whose new-file line number falls in `range`.
///
/// Removals advance the old counter but are never retained; additions and
/// context lines are retained when their new-line number is in range. The
/// hunk header survives unconditionally. Returns `None` when no content
/// line was retained.
///
/// The output hunk's starts are rebased to the counters at its first
/// retained line, so slicing an already-sliced hunk with the same range
/// keeps the same lines.
fn slice_to_range(hunk: &DiffHunk, range: LineRange) -> Option<DiffHunk> {
    let mut kept: Vec<String> = Vec::new();
    let mut rebased: Option<(u32, u32)> = None;

    for line in hunk.numbered_body() {
        let keep = match line.kind {
            LineKind::Removal => false,
            LineKind::Addition | LineKind::Context => range.contains(line.new_line),
        };
        if keep {
            rebased.get_or_insert((line.old_line, line.new_line));
            kept.push(line.raw.to_string());
        }
    }

    let (old_start, new_start) = rebased?;
    let mut lines = Vec::with_capacity(kept.len() + 1);
    lines.push(hunk.header.clone());
    lines.extend(kept);

    Some(DiffHunk {
        header: hunk.header.clone(),
        lines,
        old_start,
        new_start,
    })
}

/// Drop the hunk unless some line matches; with context > 0, narrow it to
/// the matched lines plus their surrounding context (header always kept).
fn grep_hunk(hunk: &DiffHunk, re: &Regex, context: usize) -> Option<DiffHunk> {
    let matches: Vec<usize> = hunk
        .lines
        .iter()
        .enumerate()
        .filter(|(_, line)| re.is_match(line))
        .map(|(idx, _)| idx)
        .collect();

    if matches.is_empty() {
        return None;
    }
    if context == 0 {
        return Some(hunk.clone());
    }

    let mut keep = vec![false; hunk.lines.len()];
    keep[0] = true;
    for &idx in &matches {
        let lo = idx.saturating_sub(context);
        let hi = (idx + context).min(hunk.lines.len() - 1);
        for slot in &mut keep[lo..=hi] {
            *slot = true;
        }
    }

    let lines: Vec<String> = hunk
        .lines
        .iter()
        .zip(&keep)
        .filter(|(_, kept)| **kept)
        .map(|(line, _)| line.clone())
        .collect();

    Some(DiffHunk {
        header: hunk.header.clone(),
        lines,
        old_start: hunk.old_start,
        new_start: hunk.new_start,
    })
}

/// Compile the grep pattern, degrading invalid regexes to a literal match.
fn compile_grep(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .ok()
        .or_else(|| Regex::new(&regex::escape(pattern)).ok())
}
