use error_set::error_set;
use std::process::Command;

pub mod anchor;
pub mod diff;
pub mod filter;
pub mod render;

pub use anchor::{DiffSide, HunkTarget, build_link, file_anchor, hunk_target};
pub use diff::{Diff, DiffFile, DiffHunk, LineKind, NumberedLine};
pub use filter::{FilterOptions, LineRange, filter};
pub use render::{NO_OUTPUT_MESSAGE, RenderInfo, RenderOptions, Rendered, render};

error_set! {
    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffFailed { message: String },
        #[display("git diff failed: {stderr}")]
        DiffExitError { stderr: String },
        #[display("Invalid UTF-8 in git diff output: {message}")]
        InvalidUtf8 { message: String },
    }
}

/// Main interface: diff a repository, filter, and render within budgets
pub struct DiffLens<'a> {
    repo_path: &'a str,
}

impl<'a> DiffLens<'a> {
    /// Create a new DiffLens for the given repository path
    pub fn new(repo_path: &'a str) -> Self {
        Self { repo_path }
    }

    /// Produce a bounded review of the working tree (or staged) changes.
    ///
    /// # Examples
    /// ```no_run
    /// # use diff_lens::{DiffLens, FilterOptions, RenderOptions};
    /// let lens = DiffLens::new(".");
    /// let opts = RenderOptions { base_url: None, max_lines: 400, max_hunks: 40 };
    /// let review = lens.review(false, &FilterOptions::default(), &opts).unwrap();
    /// println!("{}", review.text);
    /// ```
    pub fn review(
        &self,
        staged: bool,
        filters: &FilterOptions,
        opts: &RenderOptions,
    ) -> Result<Rendered, GitCommandError> {
        let raw = self.get_raw_diff(staged, &filters.paths)?;
        let parsed = Diff::parse(&raw);
        let narrowed = filter(&parsed, filters);
        Ok(render(&narrowed, opts))
    }

    /// Get raw git diff output for the working tree or the index.
    ///
    /// Path filters are also passed to git so huge repositories do not
    /// pay for diffing files the prefix filter would drop anyway; the
    /// in-memory filter still applies for exactness.
    fn get_raw_diff(&self, staged: bool, paths: &[String]) -> Result<String, GitCommandError> {
        let mut args = vec![
            "-C",
            self.repo_path,
            "diff",
            "--no-ext-diff",
            "--no-color",
        ];

        if staged {
            args.push("--cached");
        }

        if !paths.is_empty() {
            args.push("--");
            args.extend(paths.iter().map(|s| s.as_str()));
        }

        let output =
            Command::new("git")
                .args(&args)
                .output()
                .map_err(|e| GitCommandError::DiffFailed {
                    message: e.to_string(),
                })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::DiffExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }
}
