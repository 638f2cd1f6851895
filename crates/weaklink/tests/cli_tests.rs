//! Integration tests for the weaklink CLI.
//!
//! These tests run the built binary against small connection exports.

use rstest::{fixture, rstest};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_weaklink(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weaklink"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute weaklink binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A temporary directory holding `edges.jsonl` with one failed link.
#[fixture]
fn export_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp.path().join("edges.jsonl"),
        r#"{"from":"a","to":"b","label":"ab","status":"Up"}
{"from":"b","to":"z","label":"bz","status":"Down"}
{"from":"a","to":"c","label":"ac","status":"Up"}
{"from":"c","to":"z","label":"cz","status":"Up"}
{"from":"z","to":"leaf","label":"zl","status":"Down"}
"#,
    )
    .expect("Failed to write export");
    temp
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    let output = run_weaklink(temp.path(), &["--help"]);
    assert!(output.status.success());

    let text = stdout(&output);
    for command in ["impact", "circuit", "paths"] {
        assert!(text.contains(command), "missing {command} in help");
    }
}

#[rstest]
fn impact_json_reports_unreachable(export_dir: TempDir) {
    let output = run_weaklink(
        export_dir.path(),
        &["impact", "--edges", "edges.jsonl", "--endpoint", "a", "--json"],
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["unreachable"], serde_json::json!(["leaf"]));
    assert_eq!(json["mode"], "undirected");
}

#[rstest]
fn circuit_json_reports_degraded(export_dir: TempDir) {
    let output = run_weaklink(
        export_dir.path(),
        &["circuit", "--edges", "edges.jsonl", "--a-point", "a", "--z-point", "z", "--json"],
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["broken"], false);
    assert_eq!(json["degraded"], true);
    assert_eq!(json["operationalStatus"], "Up");
}

#[rstest]
#[case::all(&[], 2)]
#[case::only_up(&["--only-up"], 1)]
fn paths_respects_status_filter(export_dir: TempDir, #[case] extra: &[&str], #[case] expected: usize) {
    let mut args = vec!["paths", "--edges", "edges.jsonl", "--start", "a", "--end", "z", "--json"];
    args.extend_from_slice(extra);

    let output = run_weaklink(export_dir.path(), &args);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["paths"].as_array().unwrap().len(), expected);
}

#[rstest]
fn invalid_config_fails(export_dir: TempDir) {
    fs::write(export_dir.path().join("weaklink.yaml"), "traversal:\n  workers: 0\n").unwrap();

    let output = run_weaklink(
        export_dir.path(),
        &["--config", "weaklink.yaml", "impact", "--edges", "edges.jsonl", "--endpoint", "a"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("workers"));
}

#[rstest]
fn missing_export_fails(export_dir: TempDir) {
    let output = run_weaklink(
        export_dir.path(),
        &["impact", "--edges", "absent.jsonl", "--endpoint", "a"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
}
