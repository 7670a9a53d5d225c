use dirlister_core::{DirectoryLister, ReportWriter, RuleSet, default_rule_set};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn dashes() -> String {
    "-".repeat(80)
}

#[test]
fn readme_and_git_directory() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("demo");
    write(&root, "README.md", "hello\nworld\n");
    write(&root, ".git/config", "[core]\n");
    let dest = dir.path().join("listing.txt");

    let lister = DirectoryLister::new(&root, &dest, default_rule_set()).unwrap();
    lister.run().unwrap();

    let written = fs::read_to_string(&dest).unwrap();
    let expected = format!(
        "--- Directory Structure ---\n\
         demo\n\
         └── README.md\n\
         \n\
         --- File Contents ---\n\
         \n\
         /README.md:\n\
         {d}\n\
         1 | hello\n\
         2 | world\n\
         {d}\n",
        d = dashes()
    );
    assert_eq!(written, expected);
    assert!(!written.contains(".git"));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("project");
    write(&root, "src/main.rs", "fn main() {}\n");
    write(&root, "src/lib.rs", "");
    write(&root, "Cargo.toml", "[package]\nname = \"x\"\n");
    write(&root, "notes/Todo.md", "- one\n");
    let dest = dir.path().join("out").join("listing.txt");

    let lister = DirectoryLister::new(&root, &dest, default_rule_set()).unwrap();
    let first = lister.run().unwrap();
    let first_bytes = fs::read(&dest).unwrap();
    let second = lister.run().unwrap();
    let second_bytes = fs::read(&dest).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first_bytes, first.render().into_bytes());
}

#[test]
fn output_inside_root_is_not_dumped() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "a.txt", "alpha\n");
    let dest = root.join("directory_listing.txt");

    let lister = DirectoryLister::new(root, &dest, RuleSet::default()).unwrap();
    lister.run().unwrap();
    let report = lister.run().unwrap();

    assert!(!report.tree_text.contains("directory_listing.txt"));
    assert!(!report.content_text.contains("/directory_listing.txt:"));
    assert!(report.content_text.contains("/a.txt:"));
}

#[test]
fn tree_and_content_ordering() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("r");
    write(&root, "b.txt", "b\n");
    write(&root, "a.py", "a\n");
    write(&root, "A/x.txt", "x\n");
    write(&root, "B/y.txt", "y\n");
    let dest = dir.path().join("out.txt");

    let report = DirectoryLister::new(&root, &dest, RuleSet::default())
        .unwrap()
        .generate();

    assert_eq!(
        report.tree_text,
        "r\n\
         ├── A\n\
         │   └── x.txt\n\
         ├── B\n\
         │   └── y.txt\n\
         ├── a.py\n\
         └── b.txt\n"
    );
    let headers: Vec<&str> = report
        .content_text
        .lines()
        .filter(|l| l.starts_with('/') && l.ends_with(':'))
        .collect();
    assert_eq!(headers, vec!["/a.py:", "/A/x.txt:", "/b.txt:", "/B/y.txt:"]);
}

#[test]
fn ignored_directories_contribute_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("r");
    write(&root, "node_modules/pkg/index.js", "module.exports = 1;\n");
    write(&root, "pkg/__pycache__/m.cpython.pyc", "bytes");
    write(&root, "pkg/m.py", "x = 1\n");
    write(&root, "image.PNG", "not really");
    let dest = dir.path().join("out.txt");

    let report = DirectoryLister::new(&root, &dest, default_rule_set())
        .unwrap()
        .generate();
    let text = report.render();
    assert!(!text.contains("node_modules"));
    assert!(!text.contains("__pycache__"));
    assert!(!text.contains("image.PNG"));
    assert!(text.contains("/pkg/m.py:"));
}

#[test]
fn empty_file_and_empty_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("r");
    write(&root, "blank.txt", "");
    let dest = dir.path().join("out.txt");
    let report = DirectoryLister::new(&root, &dest, RuleSet::default())
        .unwrap()
        .generate();
    assert_eq!(
        report.content_text,
        format!("\n/blank.txt:\n{d}\n[empty file]\n{d}\n", d = dashes())
    );

    let empty = dir.path().join("empty");
    fs::create_dir(&empty).unwrap();
    let report = DirectoryLister::new(&empty, &dest, RuleSet::default())
        .unwrap()
        .generate();
    assert_eq!(
        report.render(),
        "--- Directory Structure ---\nempty\n\n--- File Contents ---\n\n[no files to process were found in the target directory]\n"
    );
}

#[test]
fn writer_output_matches_render() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("deep/dir/out.txt");
    ReportWriter::write(&dest, "t\n", "c\n").unwrap();
    assert_eq!(
        fs::read_to_string(&dest).unwrap(),
        "--- Directory Structure ---\nt\n\n--- File Contents ---\nc\n"
    );
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_reported_in_both_sections() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = dir.path().join("r");
    write(&root, "locked/hidden.txt", "secret\n");
    write(&root, "open.txt", "visible\n");
    let locked = root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let dest = dir.path().join("out.txt");
    let report = DirectoryLister::new(&root, &dest, RuleSet::default())
        .unwrap()
        .generate();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let tree: Vec<&str> = report.tree_text.lines().collect();
    assert_eq!(tree[1], "├── locked");
    assert!(tree[2].starts_with("├── [error: ") && tree[2].ends_with("(locked)]"));
    assert_eq!(tree[3], "└── open.txt");
    assert!(report.content_text.contains("/locked/:\n"));
    assert!(report.content_text.contains("[error] could not list directory 'locked': "));
    assert!(!report.content_text.contains("secret"));
    assert!(report.content_text.contains("1 | visible\n"));
}
