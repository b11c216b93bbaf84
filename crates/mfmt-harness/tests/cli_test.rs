//! Integration test: harness CLI
//!
//! Validates that:
//! 1. `print` and `scan` emit canonical output for typed arguments.
//! 2. `validate` exits non-zero on a malformed format.
//! 3. `verify` passes the checked-in fixtures and writes report + log artifacts.
//! 4. `print` and `scan` with `--log` write a valid `cli` stream entry.
//!
//! Run: cargo test -p mfmt-harness --test cli_test

use std::path::{Path, PathBuf};
use std::process::Command;

fn workspace_root() -> PathBuf {
    let manifest = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn harness() -> Command {
    Command::new(env!("CARGO_BIN_EXE_harness"))
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("harness should execute");
    assert!(
        output.status.success(),
        "harness failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn print_subcommand_formats_arguments() {
    let out = stdout_of(harness().args(["print", "%05d|%s", "int:-42", "str:ok"]));
    assert_eq!(out.trim_end(), "8:-0042|ok");

    let out = stdout_of(harness().args(["print", "--capacity", "4", "%x", "uint:3735928559"]));
    assert_eq!(out.trim_end(), "8:dea");
}

#[test]
fn scan_subcommand_reports_matched_slots() {
    let out = stdout_of(harness().args(["scan", "7 words", "%d %s", "int", "str:16"]));
    assert_eq!(out.trim_end(), "2:[7, \"words\"]");
}

#[test]
fn strict_print_reports_malformed_format() {
    let out = stdout_of(harness().args(["print", "--mode", "strict", "50%!"]));
    assert_eq!(out.trim_end(), "error:malformed directive at byte offset 2");
}

#[test]
fn validate_subcommand() {
    let out = stdout_of(harness().args(["validate", "%d and %s%%"]));
    assert_eq!(out.trim_end(), "ok: 2 conversion(s), 6 literal byte(s)");

    let status = harness()
        .args(["validate", "%y"])
        .status()
        .expect("harness should execute");
    assert!(!status.success());
}

#[test]
fn verify_writes_report_and_log() {
    let dir = std::env::temp_dir().join(format!("mfmt-cli-verify-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let report = dir.join("report.md");
    let log = dir.join("verify.jsonl");

    let output = harness()
        .arg("verify")
        .arg("--fixture")
        .arg(workspace_root().join("tests/conformance/fixtures"))
        .arg("--report")
        .arg(&report)
        .arg("--log")
        .arg(&log)
        .output()
        .expect("harness verify should execute");
    assert!(
        output.status.success(),
        "verify failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let md = std::fs::read_to_string(&report).unwrap();
    assert!(md.contains("- Mode: tolerant+strict"));
    assert!(md.contains("- Failed: 0"));
    assert!(report.with_extension("json").exists());
    assert!(log.with_extension("artifacts.json").exists());

    let status = harness()
        .arg("validate-log")
        .arg(&log)
        .status()
        .expect("harness validate-log should execute");
    assert!(status.success());

    let last = std::fs::read_to_string(&log)
        .unwrap()
        .lines()
        .last()
        .map(str::to_owned)
        .unwrap();
    let last: serde_json::Value = serde_json::from_str(&last).unwrap();
    assert_eq!(last["event"], "run_complete");
    assert_eq!(last["outcome"], "pass");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn print_and_scan_log_invocations() {
    let dir = std::env::temp_dir().join(format!("mfmt-cli-log-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let print_log = dir.join("print.jsonl");
    let out = stdout_of(
        harness()
            .args(["print", "--mode", "strict", "%d!", "int:5", "--log"])
            .arg(&print_log),
    );
    assert_eq!(out.trim_end(), "2:5!");

    let scan_log = dir.join("scan.jsonl");
    let out = stdout_of(
        harness()
            .args(["scan", "x", "%d", "int", "--log"])
            .arg(&scan_log),
    );
    assert_eq!(out.trim_end(), "0:[]");

    for (path, function, mode) in [(&print_log, "print", "strict"), (&scan_log, "scan", "tolerant")] {
        let status = harness()
            .arg("validate-log")
            .arg(path)
            .status()
            .expect("harness validate-log should execute");
        assert!(status.success());

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 1);
        let entry: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(entry["event"], "invocation");
        assert_eq!(entry["stream"], "cli");
        assert_eq!(entry["function"], function);
        assert_eq!(entry["mode"], mode);
        assert_eq!(entry["outcome"], "pass");
    }
    let _ = std::fs::remove_dir_all(&dir);
}
