//! End-to-end tests for the graphbind binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn graphbind() -> Command {
    Command::cargo_bin("graphbind").expect("graphbind binary")
}

const HOSTNAME: &str = r##"{
  "@odata.type": "#microsoft.graph.security.hostname",
  "id": "contoso.com",
  "registrar": "MarkMonitor",
  "mysteryField": 42
}"##;

fn write_payload(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

#[test]
fn test_decode_summarizes_payload() {
    let temp = TempDir::new().unwrap();
    write_payload(temp.path(), "host.json", HOSTNAME);

    let output = graphbind()
        .current_dir(temp.path())
        .args(["decode", "host.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary = stdout_json(&output);
    assert_eq!(summary["schema"], "microsoft.graph.security.hostname");
    assert_eq!(summary["type"], "#microsoft.graph.security.hostname");
    assert_eq!(summary["additional"], serde_json::json!({ "mysteryField": 42 }));
}

#[test]
fn test_decode_unknown_family_fails() {
    let temp = TempDir::new().unwrap();
    write_payload(temp.path(), "host.json", HOSTNAME);

    graphbind()
        .current_dir(temp.path())
        .args(["decode", "host.json", "--family", "nope"])
        .assert()
        .failure();
}

#[test]
fn test_decode_missing_payload_fails() {
    let temp = TempDir::new().unwrap();

    graphbind()
        .current_dir(temp.path())
        .args(["decode", "missing.json"])
        .assert()
        .failure();
}

#[test]
fn test_decode_compact_is_single_line() {
    let temp = TempDir::new().unwrap();
    write_payload(temp.path(), "host.json", HOSTNAME);

    graphbind()
        .current_dir(temp.path())
        .args(["decode", "host.json", "--compact"])
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.trim_end().lines().count() == 1));
}

#[test]
fn test_roundtrip_preserves_unknown_properties() {
    let temp = TempDir::new().unwrap();
    write_payload(temp.path(), "host.json", HOSTNAME);

    let output = graphbind()
        .current_dir(temp.path())
        .args(["roundtrip", "host.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let written = stdout_json(&output);
    assert_eq!(written["registrar"], "MarkMonitor");
    assert_eq!(written["mysteryField"], 42);
    let keys: Vec<_> = written.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.last().map(String::as_str), Some("mysteryField"));
}

#[test]
fn test_roundtrip_changed_only_writes_edits() {
    let temp = TempDir::new().unwrap();
    write_payload(temp.path(), "host.json", HOSTNAME);

    let output = graphbind()
        .current_dir(temp.path())
        .args(["roundtrip", "host.json", "--changed-only", "--set", "registrar=New"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(stdout_json(&output), serde_json::json!({ "registrar": "New" }));
}

#[test]
fn test_roundtrip_rejects_bad_edit() {
    let temp = TempDir::new().unwrap();
    write_payload(temp.path(), "host.json", HOSTNAME);

    graphbind()
        .current_dir(temp.path())
        .args(["roundtrip", "host.json", "--set", "registrar"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_sets_family_and_compact_output() {
    let temp = TempDir::new().unwrap();
    write_payload(
        temp.path(),
        "reputation.json",
        r#"{"classification":"totallyNewStatus","score":3}"#,
    );
    fs::write(
        temp.path().join("graphbind.toml"),
        "[decode]\nfamily = \"hostReputation\"\n\n[encode]\npretty = false\n",
    )
    .unwrap();

    // hostReputation is not a family; the config value must reach the lookup.
    graphbind()
        .current_dir(temp.path())
        .args(["roundtrip", "reputation.json"])
        .assert()
        .failure();

    graphbind()
        .current_dir(temp.path())
        .args(["roundtrip", "reputation.json", "--family", "host"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  ").not());
}

#[test]
fn test_explicit_config_path() {
    let temp = TempDir::new().unwrap();
    write_payload(temp.path(), "host.json", HOSTNAME);
    fs::write(temp.path().join("custom.toml"), "[decode]\nfamily = \"artifact\"\n").unwrap();

    graphbind()
        .current_dir(temp.path())
        .args(["--config", "custom.toml", "decode", "host.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("microsoft.graph.security.hostname"));

    graphbind()
        .current_dir(temp.path())
        .args(["--config", "absent.toml", "decode", "host.json"])
        .assert()
        .failure();
}

#[test]
fn test_check_reports_each_payload() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("payloads");
    fs::create_dir_all(&dir).unwrap();
    write_payload(&dir, "a.json", HOSTNAME);
    write_payload(&dir, "b.json", r#"{"id": 7}"#);
    write_payload(&dir, "notes.txt", "ignored");

    graphbind()
        .current_dir(temp.path())
        .args(["check", "payloads"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a: ok #microsoft.graph.security.hostname"))
        .stdout(predicate::str::contains("b: error"))
        .stdout(predicate::str::contains("notes").not());
}

#[test]
fn test_check_all_valid_succeeds() {
    let temp = TempDir::new().unwrap();
    write_payload(temp.path(), "a.json", HOSTNAME);
    write_payload(temp.path(), "b.json", r#"{"id":"plain"}"#);

    graphbind()
        .current_dir(temp.path())
        .args(["check", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("b: ok microsoft.graph.entity"));
}

#[test]
fn test_list_types_text() {
    graphbind()
        .arg("list-types")
        .assert()
        .success()
        .stdout(predicate::str::contains("host"))
        .stdout(predicate::str::contains("#microsoft.graph.security.ipAddress"));
}

#[test]
fn test_list_types_json() {
    let output = graphbind()
        .args(["list-types", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let listed = stdout_json(&output);
    let names: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["family"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"entity".to_string()));
    assert!(names.contains(&"callRecord".to_string()));
}

#[test]
fn test_list_types_invalid_format() {
    graphbind()
        .args(["list-types", "--format", "yaml"])
        .assert()
        .failure();
}

#[test]
fn test_explain_enum() {
    graphbind()
        .args(["explain-enum", "host-reputation-classification"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hostReputationClassification"))
        .stdout(predicate::str::contains("unknownFutureValue  (sentinel)"));
}

#[test]
fn test_explain_unknown_enum_fails() {
    graphbind().args(["explain-enum", "colour"]).assert().failure();
}

#[test]
fn test_no_subcommand_fails() {
    graphbind().assert().failure();
}
