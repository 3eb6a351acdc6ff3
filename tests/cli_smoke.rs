use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn cmtscan_bin() -> &'static str {
    env!("CARGO_BIN_EXE_cmtscan")
}

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("failed to write test file");
}

#[test]
fn cli_prints_report_for_java_file() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let file = temp_dir.path().join("sample.java");
    write_file(&file, "int a = 1; // note\n/* block\nbody\n*/\n");

    let output = Command::new(cmtscan_bin())
        .arg(&file)
        .output()
        .expect("failed to execute cmtscan");

    assert!(
        output.status.success(),
        "expected success, got status {:?}, stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("cmtscan"),
        "stdout missing banner: {stdout}"
    );
    assert!(
        stdout.contains("File:"),
        "stdout missing file header: {stdout}"
    );
    assert!(
        stdout.contains("Total lines: 4"),
        "stdout missing line total: {stdout}"
    );
    assert!(
        stdout.contains("Scan Summary"),
        "stdout missing summary: {stdout}"
    );
    assert!(
        stdout.contains("Files scanned: 1"),
        "stdout missing scanned count: {stdout}"
    );
}

#[test]
fn cli_reports_unsupported_file_type() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let file = temp_dir.path().join("notes.txt");
    write_file(&file, "// not actually code\n");

    let output = Command::new(cmtscan_bin())
        .arg(&file)
        .output()
        .expect("failed to execute cmtscan");

    assert!(
        output.status.success(),
        "unsupported file type is a normal outcome, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Unsupported file type"),
        "stdout missing unsupported notice: {stdout}"
    );
    assert!(
        stdout.contains("Files scanned: 0"),
        "unsupported files should not be counted as scanned: {stdout}"
    );
}

#[test]
fn cli_missing_file_fails() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let missing = temp_dir.path().join("missing.java");

    let output = Command::new(cmtscan_bin())
        .arg(&missing)
        .output()
        .expect("failed to execute cmtscan");

    assert!(
        !output.status.success(),
        "expected failure for missing file, status: {:?}",
        output.status.code()
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error reading"),
        "stderr did not mention the read failure: {stderr}"
    );
}

#[test]
fn cli_verbose_lists_comment_spans() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let file = temp_dir.path().join("spans.java");
    write_file(&file, "// header\nint a = 1;\n");

    let output = Command::new(cmtscan_bin())
        .arg(&file)
        .arg("--verbose")
        .output()
        .expect("failed to execute cmtscan");

    assert!(
        output.status.success(),
        "expected success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("comment 0:0 .. 0:9"),
        "verbose output missing span listing: {stdout}"
    );
}

#[test]
fn cli_requires_at_least_one_file() {
    let output = Command::new(cmtscan_bin())
        .output()
        .expect("failed to execute cmtscan");

    assert!(
        !output.status.success(),
        "expected usage error without arguments, status: {:?}",
        output.status.code()
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Usage") || stderr.contains("usage"),
        "stderr missing usage text: {stderr}"
    );
}
