//! End-to-end tests that invoke the compiled `dupegen` binary and check the
//! generated tree and log against the reported counts.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use walkdir::WalkDir;

fn run_dupegen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dupegen"))
        .args(args)
        .output()
        .expect("failed to execute dupegen")
}

fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// All generated files under `root`, excluding the log artifact.
fn generated_files(root: &Path) -> Vec<walkdir::DirEntry> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name() != "log.txt")
        .collect()
}

fn count_line(text: &str, label: &str) -> usize {
    text.lines()
        .find_map(|l| l.strip_prefix(&format!("{label}: ")))
        .unwrap_or_else(|| panic!("missing '{label}' line in:\n{text}"))
        .parse()
        .unwrap()
}

#[test]
fn generates_requested_file_count_and_log() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("fixtures");
    let root_arg = root.to_str().unwrap();

    let output = run_dupegen(&[root_arg, "-n", "60", "--seed", "7"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout_str(&output);
    assert!(stdout.contains("Generation complete."));
    assert_eq!(count_line(&stdout, "Total files"), 60);

    let files = generated_files(&root);
    assert_eq!(files.len(), 60);

    let log = fs::read_to_string(root.join("log.txt")).unwrap();
    assert_eq!(count_line(&log, "Total files"), 60);
    assert_eq!(
        count_line(&log, "Unique files") + count_line(&log, "Total duplicate file names"),
        60
    );
    assert!(stdout.contains("Log file written to:"));
}

#[test]
fn duplicate_names_on_disk_match_the_log() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("fixtures");
    let root_arg = root.to_str().unwrap();

    let output = run_dupegen(&[root_arg, "-n", "100", "-p", "40", "--seed", "21"]);
    assert!(output.status.success());

    // Count physical copies per filename.
    let mut by_name: HashMap<String, usize> = HashMap::new();
    for entry in generated_files(&root) {
        *by_name
            .entry(entry.file_name().to_string_lossy().into_owned())
            .or_default() += 1;
    }

    let dupe_names: Vec<_> = by_name.iter().filter(|(n, _)| n.starts_with('d')).collect();
    assert!(!dupe_names.is_empty());
    for (name, &copies) in &dupe_names {
        assert!(copies >= 2, "{name} has only {copies} copy");
    }
    let dupe_copies: usize = dupe_names.iter().map(|(_, &c)| c).sum();
    assert_eq!(dupe_copies, 40);

    let log = fs::read_to_string(root.join("log.txt")).unwrap();
    assert_eq!(count_line(&log, "Unique duplicate file names"), dupe_names.len());
    for (name, &copies) in &dupe_names {
        let listed = log
            .lines()
            .filter(|l| l.starts_with("  "))
            .filter(|l| {
                Path::new(l.trim_start())
                    .file_name()
                    .is_some_and(|f| f.to_string_lossy() == name.as_str())
            })
            .count();
        assert_eq!(listed, copies, "log paths for {name}");
    }
}

#[test]
fn rerun_wipes_the_previous_tree() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("fixtures");
    let root_arg = root.to_str().unwrap();

    assert!(run_dupegen(&[root_arg, "-n", "20", "--seed", "1"]).status.success());
    let marker = root.join("leftover.txt");
    fs::write(&marker, "from the first run").unwrap();

    assert!(run_dupegen(&[root_arg, "-n", "20", "--seed", "2"]).status.success());
    assert!(!marker.exists());
    assert_eq!(generated_files(&root).len(), 20);
}

#[test]
fn same_seed_reproduces_the_same_log() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("fixtures");
    let root_arg = root.to_str().unwrap();

    assert!(run_dupegen(&[root_arg, "-n", "50", "--seed", "99"]).status.success());
    let first = fs::read_to_string(root.join("log.txt")).unwrap();

    assert!(run_dupegen(&[root_arg, "-n", "50", "--seed", "99"]).status.success());
    let second = fs::read_to_string(root.join("log.txt")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn logged_paths_are_absolute_and_exist() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("fixtures");
    let root_arg = root.to_str().unwrap();

    assert!(run_dupegen(&[root_arg, "-n", "40", "--seed", "3"]).status.success());
    let log = fs::read_to_string(root.join("log.txt")).unwrap();

    for line in log.lines().filter(|l| l.starts_with("  ")) {
        let path = Path::new(line.trim_start());
        assert!(path.is_absolute(), "not absolute: {line}");
        assert!(path.is_file(), "missing on disk: {line}");
    }
}

#[test]
fn config_file_supplies_defaults_cli_still_wins() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("dupegen_options.yaml"),
        "count: 15\ndupe_percent: 0\nseed: 5\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_dupegen"))
        .current_dir(tmp.path())
        .args(["fixtures"])
        .output()
        .expect("failed to execute dupegen");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = stdout_str(&output);
    assert_eq!(count_line(&stdout, "Total files"), 15);
    assert_eq!(count_line(&stdout, "Total duplicate file names"), 0);

    // CLI count overrides the config value
    let output = Command::new(env!("CARGO_BIN_EXE_dupegen"))
        .current_dir(tmp.path())
        .args(["fixtures", "-n", "8"])
        .output()
        .expect("failed to execute dupegen");
    assert!(output.status.success());
    assert_eq!(count_line(&stdout_str(&output), "Total files"), 8);
}

#[test]
fn invalid_percent_fails_before_touching_the_root() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("fixtures");

    let output = run_dupegen(&[root.to_str().unwrap(), "-p", "150"]);
    assert!(!output.status.success());
    assert!(!root.exists());
}
