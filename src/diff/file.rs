use super::hunk::DiffHunk;

/// All parsed content for a single file in a diff.
///
/// A file with zero hunks represents a pure rename, mode change, or
/// binary-file notice: only header lines, no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffFile {
    /// The "b/" side target path, or the raw `diff --git` line when the
    /// marker cannot be parsed
    pub path: String,
    /// All non-hunk lines before the first hunk (`index`, `---`, `+++`,
    /// `new file mode`, ...)
    pub header_lines: Vec<String>,
    pub hunks: Vec<DiffHunk>,
}

impl DiffFile {
    /// Start a file entry from its `diff --git` marker line.
    pub fn from_marker(line: &str) -> Self {
        DiffFile {
            path: path_from_marker(line),
            header_lines: Vec::new(),
            hunks: Vec::new(),
        }
    }

    /// Whether this entry is a pure-addition ("new file") diff.
    pub fn is_new_file(&self) -> bool {
        self.header_lines
            .iter()
            .any(|line| line.starts_with("--- /dev/null") || line.starts_with("new file mode"))
    }
}

/// Extract the destination path from `diff --git a/<old> b/<new>`.
///
/// The split happens at the last ` b/` so paths containing that byte
/// sequence resolve the same way a greedy pattern match would. Unparsable
/// markers fall back to the raw line text.
fn path_from_marker(line: &str) -> String {
    line.strip_prefix("diff --git a/")
        .and_then(|rest| rest.rsplit_once(" b/"))
        .map(|(_, new_path)| new_path.to_string())
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| line.to_string())
}
