//! Integration test: structured logging contract
//!
//! Validates that:
//! 1. log_schema.json exists and agrees with the validator's vocabulary.
//! 2. Schema examples validate.
//! 3. LogEmitter writes valid JSONL to files.
//! 4. A logged fixture run produces one valid line per case.
//! 5. ArtifactIndex hashes files correctly.
//!
//! Run: cargo test -p mfmt-harness --test structured_log_test

use std::path::{Path, PathBuf};

use mfmt_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, sha256_hex, validate_log_file,
    validate_log_line,
};
use mfmt_harness::{FixtureSet, TestRunner};

fn workspace_root() -> PathBuf {
    let manifest = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mfmt-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn load_schema() -> serde_json::Value {
    let path = workspace_root().join("tests/conformance/log_schema.json");
    let content = std::fs::read_to_string(&path).expect("log_schema.json must exist");
    serde_json::from_str(&content).expect("log_schema.json should be valid JSON")
}

#[test]
fn log_schema_exists_and_valid() {
    let schema = load_schema();
    for key in [
        "schema_version",
        "required_fields",
        "optional_fields",
        "artifact_index_schema",
        "examples",
    ] {
        assert!(
            schema[key] != serde_json::Value::Null,
            "Schema missing key: {key}"
        );
    }
    let required = schema["required_fields"].as_object().unwrap();
    for field in ["timestamp", "trace_id", "level", "event"] {
        assert!(required.contains_key(field), "required field {field} missing");
    }
}

#[test]
fn schema_vocabulary_is_enforced() {
    let schema = load_schema();
    let modes = schema["optional_fields"]["mode"].as_array().unwrap();
    for mode in modes {
        let line = LogEntry::new("a::b::001", LogLevel::Info, "sample")
            .with_mode(mode.as_str().unwrap())
            .to_jsonl()
            .unwrap();
        assert!(validate_log_line(&line, 1).is_ok(), "mode {mode} rejected");
    }
    let bad = LogEntry::new("a::b::001", LogLevel::Info, "sample")
        .with_mode("hardened")
        .to_jsonl()
        .unwrap();
    assert!(validate_log_line(&bad, 1).is_err());
}

#[test]
fn schema_examples_validate() {
    let schema = load_schema();
    let examples = schema["examples"].as_array().unwrap();
    assert!(!examples.is_empty());
    for (i, example) in examples.iter().enumerate() {
        let line = serde_json::to_string(example).unwrap();
        if let Err(errors) = validate_log_line(&line, i + 1) {
            let rendered: Vec<String> = errors.iter().map(ToString::to_string).collect();
            panic!("example {i} invalid: {}", rendered.join("; "));
        }
    }
}

#[test]
fn emitter_writes_valid_jsonl_file() {
    let dir = scratch_dir("emitter");
    let path = dir.join("run.jsonl");
    {
        let mut emitter = LogEmitter::to_file(&path, "unit", "run-1").unwrap();
        emitter.emit(LogLevel::Info, "start").unwrap();
        emitter
            .emit_entry(
                LogEntry::new(String::new(), LogLevel::Warn, "note")
                    .with_outcome(Outcome::Skip),
            )
            .unwrap();
        emitter.flush().unwrap();
    }
    let (lines, errors) = validate_log_file(&path).unwrap();
    assert_eq!(lines, 2);
    assert!(errors.is_empty(), "{errors:?}");

    let content = std::fs::read_to_string(&path).unwrap();
    let second: serde_json::Value = serde_json::from_str(content.lines().nth(1).unwrap()).unwrap();
    assert_eq!(second["trace_id"], "unit::run-1::002");
    assert_eq!(second["campaign"], "unit");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn logged_fixture_run_emits_one_line_per_case() {
    let dir = scratch_dir("logged-run");
    let path = dir.join("verify.jsonl");
    let set = FixtureSet::from_file(
        &workspace_root().join("tests/conformance/fixtures/stdio_scan.json"),
    )
    .unwrap();

    let results = {
        let mut emitter = LogEmitter::to_file(&path, "fixture-verify", "run-1").unwrap();
        let results = TestRunner::new("fixture-verify", "strict")
            .run_logged(&set, &mut emitter)
            .unwrap();
        emitter.flush().unwrap();
        results
    };

    let (lines, errors) = validate_log_file(&path).unwrap();
    assert_eq!(lines, results.len());
    assert!(errors.is_empty(), "{errors:?}");

    let content = std::fs::read_to_string(&path).unwrap();
    for line in content.lines() {
        let entry = validate_log_line(line, 0).unwrap();
        assert_eq!(entry.event, "case_result");
        assert_eq!(entry.mode.as_deref(), Some("strict"));
        assert_eq!(entry.function.as_deref(), Some("scan"));
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn artifact_index_hashes_files() {
    let dir = scratch_dir("artifacts");
    let report = dir.join("report.md");
    std::fs::write(&report, b"abc").unwrap();

    let mut index = ArtifactIndex::new("run-1", "fixture-verify");
    index.add_file(&report, "report").unwrap();
    index.add("elsewhere.json", "report", sha256_hex(b""));

    let json: serde_json::Value = serde_json::from_str(&index.to_json().unwrap()).unwrap();
    assert_eq!(json["index_version"], 1);
    assert_eq!(json["artifacts"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["artifacts"][0]["sha256"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(json["artifacts"][0]["size_bytes"], 3);
    assert!(json["artifacts"][1].get("size_bytes").is_none());
    let _ = std::fs::remove_dir_all(&dir);
}
