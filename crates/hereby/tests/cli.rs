use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const TERNARY: &str = "<?php\n$x = $cond ? 1 : 2;\n";
const CONCAT: &str = "<?php\n$msg = \"Value: \" . getValue();\n";

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hereby"))
        .args(args)
        .env_remove("HEREBY_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run hereby")
}

fn fixture(text: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.php");
    fs::write(&path, text).unwrap();
    (dir, path)
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn check_accepts_valid_files() {
    let (_dir, path) = fixture(TERNARY);
    let output = run(&["check", path_arg(&path)]);
    assert!(output.status.success(), "{}", stderr(&output));
}

#[test]
fn check_reports_syntax_errors() {
    let (_dir, path) = fixture("<?php\n$x = ;\n");
    let output = run(&["check", path_arg(&path)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("expected expression"), "{}", stderr(&output));
}

#[test]
fn missing_files_are_reported() {
    let output = run(&["check", "does/not/exist.php"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read `does/not/exist.php`"));
}

#[test]
fn assists_as_text() {
    let (_dir, path) = fixture(TERNARY);
    let output = run(&["assists", path_arg(&path), "--line", "2", "--column", "12"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "ternary-to-if-else\tConvert ternary to if/else\n");
}

#[test]
fn assists_as_json() {
    let (_dir, path) = fixture(CONCAT);
    let output = run(&["assists", path_arg(&path), "--offset", "25", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let reports: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["id"], "concat-to-heredoc");
    assert_eq!(reports[0]["label"], "Convert concatenation to heredoc");
    assert_eq!(reports[0]["line"], 2);
}

#[test]
fn apply_prints_the_rewritten_file() {
    let (_dir, path) = fixture(TERNARY);
    let output =
        run(&["apply", path_arg(&path), "ternary-to-if-else", "--line", "2", "--column", "12"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "<?php\n$x;\nif ($cond) { $x = 1; } else { $x = 2; }\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), TERNARY);
}

#[test]
fn apply_with_placeholder() {
    let (_dir, path) = fixture(TERNARY);
    let output = run(&[
        "apply",
        path_arg(&path),
        "ternary-to-if-else",
        "--offset",
        "17",
        "--placeholder",
        "null",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "<?php\n$x = null;\nif ($cond) { $x = 1; } else { $x = 2; }\n");
}

#[test]
fn apply_writes_in_place() {
    let (_dir, path) = fixture(CONCAT);
    let output =
        run(&["apply", path_arg(&path), "concat-to-heredoc", "--offset", "25", "--write"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?php\n$newVarFnCall1 = getValue();\n$msg = <<<HEREDOC_DELIMITER\nValue: {$newVarFnCall1}\nHEREDOC_DELIMITER;\n"
    );
}

#[test]
fn apply_edits_as_json() {
    let (_dir, path) = fixture(CONCAT);
    let output =
        run(&["apply", path_arg(&path), "concat-to-heredoc", "--offset", "25", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let change: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(change["path"], path_arg(&path));
    let edits = change["edits"].as_array().unwrap();
    assert_eq!(edits.len(), 2);
    assert_eq!(edits[0]["start"], edits[0]["end"]);
    assert_eq!(edits[0]["insert"], "$newVarFnCall1 = getValue();\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), CONCAT);
}

#[test]
fn inapplicable_assists_fail() {
    let (_dir, path) = fixture(TERNARY);
    let output = run(&["apply", path_arg(&path), "concat-to-heredoc", "--offset", "17"]);
    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("cannot apply `concat-to-heredoc`"), "{stderr}");
    assert!(stderr.contains("assist is not applicable here"), "{stderr}");
}

#[test]
fn unknown_assists_are_rejected() {
    let (_dir, path) = fixture(TERNARY);
    let output = run(&["apply", path_arg(&path), "inline-variable", "--offset", "17"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown assist `inline-variable`"), "{}", stderr(&output));
}

#[test]
fn positions_outside_the_file_are_rejected() {
    let (_dir, path) = fixture(TERNARY);
    let output = run(&["assists", path_arg(&path), "--line", "9", "--column", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("9:1 is not a position in the file"), "{}", stderr(&output));
}
