use super::file::DiffFile;
use super::hunk::DiffHunk;

/// A complete parsed diff: file entries in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    pub files: Vec<DiffFile>,
}

impl Diff {
    /// Parse raw unified-diff text into structured form.
    ///
    /// Never fails: unparsable markers degrade to raw-text paths and
    /// zero-valued hunk starts, and lines seen before the first
    /// `diff --git ` marker are dropped because there is no file to
    /// attach them to.
    pub fn parse(text: &str) -> Self {
        let mut files: Vec<DiffFile> = Vec::new();

        for line in text.lines() {
            if line.starts_with("diff --git ") {
                files.push(DiffFile::from_marker(line));
            } else if line.starts_with("@@ ") {
                if let Some(file) = files.last_mut() {
                    file.hunks.push(DiffHunk::new(line));
                }
            } else if let Some(file) = files.last_mut() {
                match file.hunks.last_mut() {
                    Some(hunk) => hunk.push_line(line),
                    None => file.header_lines.push(line.to_string()),
                }
            }
        }

        Diff { files }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn parse_empty_diff() {
        let diff = Diff::parse("");
        assert_eq!(diff.files.len(), 0);
    }

    #[test]
    fn parse_single_file() {
        let text = r#"diff --git a/flake.nix b/flake.nix
index abc1234..def5678 100644
--- a/flake.nix
+++ b/flake.nix
@@ -136,0 +137 @@
+      debug = true;
"#;
        let diff = Diff::parse(text);
        assert_eq!(diff.files.len(), 1);
        assert_eq!(diff.files[0].path, "flake.nix");
        assert_eq!(
            diff.files[0].header_lines,
            vec![
                "index abc1234..def5678 100644",
                "--- a/flake.nix",
                "+++ b/flake.nix"
            ]
        );
        assert_eq!(diff.files[0].hunks.len(), 1);
        assert_eq!(diff.files[0].hunks[0].old_start, 136);
        assert_eq!(diff.files[0].hunks[0].new_start, 137);
        assert_eq!(
            diff.files[0].hunks[0].lines,
            vec!["@@ -136,0 +137 @@", "+      debug = true;"]
        );
    }

    #[test]
    fn parse_multiple_files() {
        let text = r#"diff --git a/flake.nix b/flake.nix
index abc1234..def5678 100644
--- a/flake.nix
+++ b/flake.nix
@@ -136,0 +137 @@
+      debug = true;
diff --git a/gtk.nix b/gtk.nix
index 111..222 100644
--- a/gtk.nix
+++ b/gtk.nix
@@ -11,0 +12 @@
+    gtk.cursorTheme.size = 24;
"#;
        let diff = Diff::parse(text);
        assert_eq!(diff.files.len(), 2);
        assert_eq!(diff.files[0].path, "flake.nix");
        assert_eq!(diff.files[1].path, "gtk.nix");
        assert_eq!(diff.files[1].hunks[0].new_start, 12);
    }

    #[test]
    fn parse_multiple_hunks_per_file() {
        let text = r#"diff --git a/config.nix b/config.nix
index fa2da6e..41114ff 100644
--- a/config.nix
+++ b/config.nix
@@ -2,0 +3 @@ line 2
+# FIRST INSERTION
@@ -8,0 +10 @@ line 8
+# SECOND INSERTION
"#;
        let diff = Diff::parse(text);
        assert_eq!(diff.files[0].hunks.len(), 2);
        assert_eq!(diff.files[0].hunks[0].new_start, 3);
        assert_eq!(diff.files[0].hunks[1].new_start, 10);
        assert_eq!(
            diff.files[0].hunks[1].header,
            "@@ -8,0 +10 @@ line 8"
        );
    }

    #[test]
    fn lines_before_first_marker_are_dropped() {
        let text = "warning: something odd\nstray line\ndiff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n@@ -1 +1 @@\n-x\n+y\n";
        let diff = Diff::parse(text);
        assert_eq!(diff.files.len(), 1);
        assert_eq!(diff.files[0].header_lines, vec!["--- a/a.txt", "+++ b/a.txt"]);
    }

    #[test]
    fn header_only_file_has_no_hunks() {
        let text = r#"diff --git a/script.sh b/script.sh
old mode 100644
new mode 100755
"#;
        let diff = Diff::parse(text);
        assert_eq!(diff.files.len(), 1);
        assert_eq!(diff.files[0].path, "script.sh");
        assert!(diff.files[0].hunks.is_empty());
        assert_eq!(
            diff.files[0].header_lines,
            vec!["old mode 100644", "new mode 100755"]
        );
    }

    #[test]
    fn unparsable_hunk_header_gets_zero_starts() {
        let text = "diff --git a/a.txt b/a.txt\n@@ mangled header\n+something\n";
        let diff = Diff::parse(text);
        let hunk = &diff.files[0].hunks[0];
        assert_eq!(hunk.old_start, 0);
        assert_eq!(hunk.new_start, 0);
        assert_eq!(hunk.lines, vec!["@@ mangled header", "+something"]);
    }

    #[test]
    fn no_newline_marker_lands_in_hunk_body() {
        let text = "diff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n@@ -1 +1 @@\n-old\n+new\n\\ No newline at end of file\n";
        let diff = Diff::parse(text);
        let hunk = &diff.files[0].hunks[0];
        assert_eq!(hunk.lines.last().unwrap(), "\\ No newline at end of file");
    }
}
