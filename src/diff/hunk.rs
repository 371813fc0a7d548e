use super::{is_addition, is_removal};

/// A single hunk from a unified diff.
///
/// `lines[0]` is always the `@@` header line itself; the remaining entries
/// are the raw body lines with their `+`/`-`/space prefixes intact.
/// `old_start`/`new_start` come from the header and fall back to `0` when
/// the header cannot be parsed (parsing never fails).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// The original `@@ -a,b +c,d @@` line, exact text
    pub header: String,
    /// Header line followed by the raw body lines
    pub lines: Vec<String>,
    pub old_start: u32,
    pub new_start: u32,
}

/// Classification of a hunk body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Addition,
    Removal,
    Context,
}

/// A body line paired with the old/new line numbers it occupies.
///
/// For additions only `new_line` is meaningful, for removals only
/// `old_line`; context lines carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedLine<'a> {
    pub raw: &'a str,
    pub kind: LineKind,
    pub old_line: u32,
    pub new_line: u32,
}

impl DiffHunk {
    /// Start a hunk from its `@@` header line.
    pub fn new(header: &str) -> Self {
        let (old_start, new_start) = parse_header(header).unwrap_or((0, 0));
        DiffHunk {
            header: header.to_string(),
            lines: vec![header.to_string()],
            old_start,
            new_start,
        }
    }

    /// Append a raw body line.
    pub fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Body lines without the header entry.
    pub fn body(&self) -> &[String] {
        self.lines.get(1..).unwrap_or(&[])
    }

    /// Replay the body, assigning each line the old/new line numbers it
    /// occupies when counting from `old_start`/`new_start`.
    ///
    /// Additions and context lines advance the new counter, removals and
    /// context lines advance the old counter. This is the same bookkeeping
    /// git and hosted diff viewers use, so the numbers line up with what a
    /// reviewer sees.
    pub fn numbered_body(&self) -> Vec<NumberedLine<'_>> {
        let mut old = self.old_start;
        let mut new = self.new_start;
        self.body()
            .iter()
            .map(|raw| {
                if is_addition(raw) {
                    let line = NumberedLine {
                        raw,
                        kind: LineKind::Addition,
                        old_line: old,
                        new_line: new,
                    };
                    new += 1;
                    line
                } else if is_removal(raw) {
                    let line = NumberedLine {
                        raw,
                        kind: LineKind::Removal,
                        old_line: old,
                        new_line: new,
                    };
                    old += 1;
                    line
                } else {
                    let line = NumberedLine {
                        raw,
                        kind: LineKind::Context,
                        old_line: old,
                        new_line: new,
                    };
                    old += 1;
                    new += 1;
                    line
                }
            })
            .collect()
    }
}

/// Parse a hunk header to extract old and new start positions.
///
/// Accepts `@@ -<old>[,<count>] +<new>[,<count>] @@ [context]`; the counts
/// are ignored.
fn parse_header(header: &str) -> Option<(u32, u32)> {
    let header = header.strip_prefix("@@ ")?;
    let end_idx = header.find(" @@")?;
    let range_part = &header[..end_idx];

    let parts: Vec<&str> = range_part.split(' ').collect();
    if parts.len() != 2 {
        return None;
    }

    let old_start = parse_range_start(parts[0].strip_prefix('-').unwrap_or(parts[0]))?;
    let new_start = parse_range_start(parts[1].strip_prefix('+').unwrap_or(parts[1]))?;

    Some((old_start, new_start))
}

/// Parse the start line number from a range like "136,0" or "137"
fn parse_range_start(range: &str) -> Option<u32> {
    let num_str = match range.find(',') {
        Some(idx) => &range[..idx],
        None => range,
    };

    num_str.parse::<u32>().ok()
}
