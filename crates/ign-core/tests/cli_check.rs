//! CLI E2E tests for `ign-check`.
//!
//! Validates:
//! - Verdicts map to the documented exit codes
//! - JSON output carries status, error kind, version and report entries
//! - Standard input is accepted via `-`
//! - Options resolve from flag, environment and user config dir
//! - Bad options and unreadable inputs fail with their own exit codes

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

const CURRENT: &str = r#"{
  "ignition": {"version": {"major": 2, "minor": 0}},
  "systemd": {"units": [{"name": "app.service", "enable": true}]}
}"#;

const LEGACY: &str = r#"{
  "ignitionVersion": 1,
  "storage": {"filesystems": [{"device": "/dev/sda1", "format": "ext4",
                               "files": [{"path": "/etc/motd", "contents": "hi"}]}]}
}"#;

const DUPLICATE_USERS: &str = r#"{
  "ignition": {"version": {"major": 2, "minor": 0}},
  "passwd": {"users": [{"name": "core"}, {"name": "core"}]}
}"#;

/// Command for the ign-check binary, isolated from the caller's options.
fn ign_check(config_home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("ign-check");
    cmd.timeout(Duration::from_secs(60))
        .env_remove("IGN_CHECK_OPTIONS")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", config_home);
    cmd
}

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write input");
    path
}

fn json_output(cmd: &mut Command, code: i32) -> Value {
    let output = cmd.assert().code(code).get_output().stdout.clone();
    serde_json::from_slice(&output).expect("parse JSON")
}

// ============================================================================
// Verdicts
// ============================================================================

#[test]
fn test_current_config_accepted() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "user.ign", CURRENT);
    let json = json_output(
        ign_check(dir.path()).args(["--format", "json", "check"]).arg(&input),
        0,
    );
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], "2.0");
    assert_eq!(json["report"], serde_json::json!([]));
    assert!(json.get("error").is_none());
    assert!(json.get("config").is_none());
}

#[test]
fn test_legacy_config_translated_with_deprecation() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "legacy.ign", LEGACY);
    let json = json_output(
        ign_check(dir.path())
            .args(["--format", "json", "check", "--print-config"])
            .arg(&input),
        0,
    );
    assert_eq!(json["status"], "ok");
    let report = json["report"].as_array().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0]["severity"], "deprecated");
    assert!(report[0].get("position").is_none());
    assert_eq!(
        json["config"]["storage"]["files"][0]["contents"]["source"],
        "data:;base64,aGk="
    );
}

#[test]
fn test_current_only_rejects_legacy() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "legacy.ign", LEGACY);
    let json = json_output(
        ign_check(dir.path())
            .args(["--format", "json", "check", "--current-only"])
            .arg(&input),
        10,
    );
    assert_eq!(json["status"], "invalid");
    assert_eq!(json["error"], "invalid");
}

#[test]
fn test_type_mismatch_is_positioned() {
    let dir = tempdir().unwrap();
    let input = write_input(
        &dir,
        "bad.ign",
        r#"{"ignition":{"version":{"major":2,"minor":0}}, "storage": "not-an-object"}"#,
    );
    let json = json_output(
        ign_check(dir.path()).args(["--format", "json", "check"]).arg(&input),
        10,
    );
    assert_eq!(json["status"], "invalid");
    let report = json["report"].as_array().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0]["severity"], "error");
    assert_eq!(report[0]["position"]["line"], 1);
    assert!(report[0]["position"]["highlight"]
        .as_str()
        .unwrap()
        .contains("not-an-object"));
}

#[test]
fn test_cloud_config_is_not_a_config() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "user-data", "#cloud-config\nhostname: node-1\n");
    let json = json_output(
        ign_check(dir.path()).args(["--format", "json", "check"]).arg(&input),
        2,
    );
    assert_eq!(json["status"], "not_a_config");
    assert_eq!(json["error"], "foreign_format");
    assert_eq!(json["report"], serde_json::json!([]));
}

#[test]
fn test_empty_and_script_inputs() {
    let dir = tempdir().unwrap();
    let empty = write_input(&dir, "empty", "");
    let json = json_output(
        ign_check(dir.path()).args(["--format", "json", "check"]).arg(&empty),
        2,
    );
    assert_eq!(json["error"], "empty");

    let script = write_input(&dir, "script", "#!/bin/sh\necho hi\n");
    let json = json_output(
        ign_check(dir.path()).args(["--format", "json", "check"]).arg(&script),
        2,
    );
    assert_eq!(json["error"], "script");
}

#[test]
fn test_stdin_input() {
    let dir = tempdir().unwrap();
    ign_check(dir.path())
        .args(["check", "-"])
        .write_stdin(CURRENT)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("<stdin>: ok (version 2.0)"));
}

#[test]
fn test_human_output_shows_location() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "bad.ign", "{\n  \"ignition\": {\"version\": {\"major\": 2,}}\n}");
    ign_check(dir.path())
        .arg("check")
        .arg(&input)
        .assert()
        .code(10)
        .stdout(predicate::str::contains("error at line 2, column"))
        .stdout(predicate::str::contains("config is not valid"));
}

// ============================================================================
// Options resolution
// ============================================================================

#[test]
fn test_options_flag_disables_rule() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "users.ign", DUPLICATE_USERS);
    let opts = write_input(&dir, "opts.json", r#"{"disabledRules": ["passwd"]}"#);

    let json = json_output(
        ign_check(dir.path()).args(["--format", "json", "check"]).arg(&input),
        0,
    );
    assert_eq!(json["report"][0]["severity"], "warning");

    let json = json_output(
        ign_check(dir.path())
            .args(["--format", "json", "--options"])
            .arg(&opts)
            .arg("check")
            .arg(&input),
        0,
    );
    assert_eq!(json["report"], serde_json::json!([]));
}

#[test]
fn test_options_from_env() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "users.ign", DUPLICATE_USERS);
    let opts = write_input(&dir, "opts.json", r#"{"disabledRules": ["passwd"]}"#);
    let json = json_output(
        ign_check(dir.path())
            .env("IGN_CHECK_OPTIONS", &opts)
            .args(["--format", "json", "check"])
            .arg(&input),
        0,
    );
    assert_eq!(json["report"], serde_json::json!([]));
}

#[test]
fn test_options_from_user_config_dir() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().join("ign-check");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("options.json"),
        r##"{"markers": {"script": [{"prefix": "#"}]}}"##,
    )
    .unwrap();
    let input = write_input(&dir, "commented", "# just a comment\n{}\n");

    let json = json_output(
        ign_check(dir.path()).args(["--format", "json", "check"]).arg(&input),
        2,
    );
    assert_eq!(json["error"], "script");
}

#[test]
fn test_malformed_options_exit_11() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "user.ign", CURRENT);
    let opts = write_input(&dir, "opts.json", "{not json");
    ign_check(dir.path())
        .arg("--options")
        .arg(&opts)
        .arg("check")
        .arg(&input)
        .assert()
        .code(11)
        .stderr(predicate::str::contains("invalid options file"));
}

#[test]
fn test_unknown_rule_exit_11() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "user.ign", CURRENT);
    let opts = write_input(&dir, "opts.json", r#"{"disabledRules": ["no-such-rule"]}"#);
    ign_check(dir.path())
        .arg("--options")
        .arg(&opts)
        .arg("check")
        .arg(&input)
        .assert()
        .code(11)
        .stderr(predicate::str::contains("no-such-rule"));
}

#[test]
fn test_missing_input_exit_13() {
    let dir = tempdir().unwrap();
    ign_check(dir.path())
        .arg("check")
        .arg(dir.path().join("missing.ign"))
        .assert()
        .code(13)
        .stderr(predicate::str::contains("cannot read"));
}

// ============================================================================
// Schema
// ============================================================================

#[test]
fn test_schema_is_json() {
    let dir = tempdir().unwrap();
    let output = ign_check(dir.path())
        .arg("schema")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let schema: Value = serde_json::from_slice(&output).expect("parse schema");
    assert!(schema["properties"]["passwd"].is_object());
}
