//! Integration tests: the binary's behaviour before it takes over the terminal.

use std::path::PathBuf;
use std::process::{Command, Output};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gridcore-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir.join(name)
}

fn run(args: &[&str]) -> Output {
    let log = scratch("gridcore.log");
    Command::new(env!("CARGO_BIN_EXE_gridcore"))
        .args(args)
        .arg("--log-file")
        .arg(&log)
        .env("GRIDCORE_CONFIG", scratch("missing-config.toml"))
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_gridcore"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("0.1.0"),
        "Expected output to contain version '0.1.0', but got: {stdout}"
    );
}

#[test]
fn missing_rows_file_fails_before_drawing() {
    let output = run(&["/definitely/not/here.json"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FileNotFound"), "stderr was: {stderr}");
}

#[test]
fn object_instead_of_array_is_rejected() {
    let rows = scratch("object.json");
    std::fs::write(&rows, r#"{"id": 1}"#).expect("write rows");

    let output = run(&[rows.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("InvalidRows"), "stderr was: {stderr}");
}

#[test]
fn unknown_sort_column_is_a_configuration_error() {
    let rows = scratch("rows.json");
    std::fs::write(&rows, r#"[{"id": 1, "name": "a"}]"#).expect("write rows");

    let output = run(&[rows.to_str().unwrap(), "--sort-by", "price"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("InvalidConfiguration"), "stderr was: {stderr}");
    assert!(stderr.contains("sort_by"), "stderr was: {stderr}");
}
