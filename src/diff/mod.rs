pub mod file;
pub mod full;
pub mod hunk;

pub use file::DiffFile;
pub use full::Diff;
pub use hunk::{DiffHunk, LineKind, NumberedLine};

/// True if a hunk body line is a real addition.
///
/// A line counts as added only when it starts with `+` and is not a
/// `+++` file-header-style line embedded in the hunk body.
pub fn is_addition(line: &str) -> bool {
    line.starts_with('+') && !line.starts_with("+++")
}

/// True if a hunk body line is a real removal (`-` but not `---`).
pub fn is_removal(line: &str) -> bool {
    line.starts_with('-') && !line.starts_with("---")
}
