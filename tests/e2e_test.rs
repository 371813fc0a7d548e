use diff_lens::{DiffLens, FilterOptions, NO_OUTPUT_MESSAGE, RenderOptions};
use git2::{Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Test fixture for a git repository
struct Fixture {
    dir: TempDir,
    repo: Repository,
}

impl Fixture {
    /// Create a new empty repo with deterministic config
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repo = Repository::init(dir.path()).expect("Failed to init repo");

        // Deterministic config
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        Self { dir, repo }
    }

    fn path(&self) -> &str {
        self.dir.path().to_str().unwrap()
    }

    /// Write a file to the repo
    fn write_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Stage a file
    fn stage_file(&self, name: &str) {
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    /// Create a commit
    fn commit(&self, message: &str) {
        let sig = Signature::new(
            "Test User",
            "test@example.com",
            &git2::Time::new(1234567890, 0),
        )
        .unwrap();
        let tree_id = self.repo.index().unwrap().write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        if self.repo.head().is_ok() {
            let parent = self.repo.head().unwrap().peel_to_commit().unwrap();
            self.repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
                .unwrap();
        } else {
            self.repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &[])
                .unwrap();
        }
    }
}

fn wide_opts() -> RenderOptions {
    RenderOptions {
        base_url: None,
        max_lines: 400,
        max_hunks: 40,
    }
}

// =============================================================================
// Case 1: Modified line in the working tree
// =============================================================================

#[test]
fn case_01_modified_line_numbering() {
    let fixture = Fixture::new();

    let initial: String = (1..=10).map(|i| format!("line {}\n", i)).collect();
    fixture.write_file("notes.txt", &initial);
    fixture.stage_file("notes.txt");
    fixture.commit("initial");

    let modified = initial.replace("line 5\n", "line five\n");
    fixture.write_file("notes.txt", &modified);

    let review = DiffLens::new(fixture.path())
        .review(false, &FilterOptions::default(), &wide_opts())
        .unwrap();

    assert_eq!(review.info.shown_files, 1);
    assert_eq!(review.info.shown_hunks, 1);
    assert!(!review.info.truncated);
    assert!(review.diff_text.starts_with("  notes.txt\n"));
    assert!(review.diff_text.contains("-5 line 5\n"));
    assert!(review.diff_text.contains("+5 line five\n"));
    assert!(review.text.contains("== notes.txt (hunk +"));
}

// =============================================================================
// Case 2: Staged new file cut short by the line budget
// =============================================================================

#[test]
fn case_02_staged_new_file_truncation() {
    let fixture = Fixture::new();

    fixture.write_file("keep.txt", "anchor\n");
    fixture.stage_file("keep.txt");
    fixture.commit("initial");

    let content: String = (1..=5).map(|i| format!("entry {}\n", i)).collect();
    fixture.write_file("new.txt", &content);
    fixture.stage_file("new.txt");

    let opts = RenderOptions {
        base_url: None,
        max_lines: 3,
        max_hunks: 40,
    };
    let review = DiffLens::new(fixture.path())
        .review(true, &FilterOptions::default(), &opts)
        .unwrap();

    assert!(review.info.truncated);
    assert!(review.info.shown_lines <= 3);
    assert_eq!(
        review.info.suggested_ranges.get("new.txt").unwrap(),
        &vec!["1-3".to_string(), "4-5".to_string()]
    );
    assert!(review.text.contains("... (truncated)"));
}

// =============================================================================
// Case 3: Grep that matches nothing leaves the sentinel
// =============================================================================

#[test]
fn case_03_grep_without_matches() {
    let fixture = Fixture::new();

    fixture.write_file("config.txt", "alpha\nbeta\n");
    fixture.stage_file("config.txt");
    fixture.commit("initial");
    fixture.write_file("config.txt", "alpha\ngamma\n");

    let filters = FilterOptions {
        grep: Some("no_such_token".to_string()),
        ..FilterOptions::default()
    };
    let review = DiffLens::new(fixture.path())
        .review(false, &filters, &wide_opts())
        .unwrap();

    assert_eq!(review.text, NO_OUTPUT_MESSAGE);
    assert_eq!(review.diff_text, "");
    assert_eq!(review.info.shown_files, 0);
}

// =============================================================================
// Case 4: Path prefix narrows a multi-file change
// =============================================================================

#[test]
fn case_04_path_prefix_filter() {
    let fixture = Fixture::new();

    fixture.write_file("src/lib.txt", "one\n");
    fixture.write_file("docs/guide.txt", "intro\n");
    fixture.stage_file("src/lib.txt");
    fixture.stage_file("docs/guide.txt");
    fixture.commit("initial");

    fixture.write_file("src/lib.txt", "one\ntwo\n");
    fixture.write_file("docs/guide.txt", "intro\nmore\n");

    let filters = FilterOptions {
        paths: vec!["src".to_string()],
        ..FilterOptions::default()
    };
    let review = DiffLens::new(fixture.path())
        .review(false, &filters, &wide_opts())
        .unwrap();

    assert_eq!(review.info.shown_files, 1);
    assert!(review.diff_text.contains("src/lib.txt"));
    assert!(!review.diff_text.contains("docs/guide.txt"));
}
