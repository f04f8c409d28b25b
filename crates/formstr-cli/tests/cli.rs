use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

fn formstr() -> Command {
    let mut command = Command::cargo_bin("formstr").expect("formstr binary");
    command.env_remove("FORMSTR_LOG");
    command
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string(value).expect("render")).expect("write fixture");
}

fn config_with_draft_dir(dir: &Path) -> std::path::PathBuf {
    let config = dir.join("config.toml");
    let drafts = dir.join("drafts");
    fs::write(
        &config,
        format!("draft_dir = {:?}\n", drafts.display().to_string()),
    )
    .expect("write config");
    config
}

#[test]
fn decode_prints_builder_state() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let spec = temp.path().join("form.json");
    write_json(
        &spec,
        &json!([
            ["d", "abc"],
            ["name", "Survey"],
            ["settings", "{\"titleTextSize\":\"large\"}"],
            ["field", "q1", "short_text", "Name", {}, []]
        ]),
    );

    let output = formstr()
        .args(["decode", spec.to_str().expect("utf8"), "--id", "abc"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let decoded: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(decoded["name"], "Survey");
    assert_eq!(decoded["settings"]["titleTextSize"], 32);
    assert_eq!(decoded["settings"]["formId"], "abc");
    assert_eq!(decoded["fields"][0][1], "q1");
}

#[test]
fn decode_rejects_corrupt_settings() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let spec = temp.path().join("form.json");
    write_json(&spec, &json!([["settings", "{oops"]]));

    formstr()
        .args(["decode", spec.to_str().expect("utf8"), "--id", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode"));
}

#[test]
fn encode_orders_identifier_name_settings_then_fields() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let state = temp.path().join("state.json");
    write_json(
        &state,
        &json!({
            "name": "Quick poll",
            "settings": {"formId": "f1", "customKey": 7},
            "questions": [["field", "q1", "number", "Age", {}, []]]
        }),
    );

    let output = formstr()
        .args(["encode", state.to_str().expect("utf8")])
        .output()
        .expect("run");
    assert!(output.status.success());
    let spec: Vec<Vec<Value>> = serde_json::from_slice(&output.stdout).expect("json output");
    let kinds: Vec<_> = spec.iter().map(|tag| tag[0].clone()).collect();
    assert_eq!(kinds, vec![json!("d"), json!("name"), json!("settings"), json!("field")]);
    assert_eq!(spec[0][1], "f1");
    let settings: Value =
        serde_json::from_str(spec[2][1].as_str().expect("settings string")).expect("settings");
    assert_eq!(settings["customKey"], 7);
}

#[test]
fn new_uses_the_given_name() {
    formstr()
        .args(["new", "--name", "Team lunch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Team lunch"))
        .stdout(predicate::str::contains("Click to edit question"));
}

#[test]
fn drafts_can_be_saved_listed_and_deleted() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let config = config_with_draft_dir(temp.path());
    let config = config.to_str().expect("utf8");
    let spec = temp.path().join("form.json");
    write_json(
        &spec,
        &json!([
            ["d", "draft-1"],
            ["name", "Draft form"],
            ["field", "q1", "short_text", "Name", {}, []]
        ]),
    );

    formstr()
        .args(["--config", config, "draft", "save", spec.to_str().expect("utf8")])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft-1"));

    let output = formstr()
        .args(["--config", config, "draft", "list"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let listed: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(
        listed,
        json!([{"tempId": "draft-1", "name": "Draft form", "questions": 1}])
    );

    formstr()
        .args(["--config", config, "draft", "delete", "draft-1"])
        .assert()
        .success();
    formstr()
        .args(["--config", config, "draft", "delete", "draft-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no draft with id"));
}

#[test]
fn draft_save_rejects_empty_ids() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let config = config_with_draft_dir(temp.path());
    let config = config.to_str().expect("utf8");
    let spec = temp.path().join("form.json");
    write_json(&spec, &json!([["d", ""], ["name", "x"]]));
    let spec = spec.to_str().expect("utf8");

    formstr()
        .args(["--config", config, "draft", "save", spec, "--id", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id must not be empty"));
    formstr()
        .args(["--config", config, "draft", "save", spec])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no form id"));

    formstr()
        .args(["--config", config, "draft", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn schema_describes_settings() {
    formstr()
        .args(["schema", "settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("titleBackgroundType"));
}
