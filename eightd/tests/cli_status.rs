//! CLI tests for `eightd status`, `eightd validate` and `eightd init`.

use std::process::{Command, Output};

use eightd::exit_codes;
use eightd::io::init::{InitOptions, init_workspace};
use eightd::test_support::{TestDir, answers_json_all_steps, answers_json_with_issue};
use serde_json::json;

fn eightd(dir: &TestDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eightd"))
        .current_dir(dir.path())
        .env_remove("ACME_DEFAULTS_FILE")
        .env_remove("ACME_OUTPUT_FORMAT")
        .env_remove("ACME_FEEDBACK_LOG")
        .args(args)
        .output()
        .expect("run eightd")
}

#[test]
fn status_after_init_is_stalled() {
    let dir = TestDir::new().expect("dir");
    init_workspace(dir.path(), &InitOptions { force: false }).expect("init");

    let output = eightd(&dir, &["status"]);
    assert_eq!(output.status.code(), Some(exit_codes::STALLED));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("Doing: (none available - prerequisites missing)"));
}

#[test]
fn status_with_issue_lists_next_steps() {
    let dir = TestDir::new().expect("dir");
    dir.write_json("customer_defaults.json", &answers_json_with_issue())
        .expect("write");

    let output = eightd(&dir, &["status"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("Todo (available next):\n- plan\n- team\n"));
}

#[test]
fn status_json_reports_complete_workflow() {
    let dir = TestDir::new().expect("dir");
    dir.write_json("customer_defaults.json", &answers_json_all_steps())
        .expect("write");

    let output = eightd(&dir, &["status", "--format", "json"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["status"]["missing"], json!([]));
    assert_eq!(payload["status"]["done"].as_array().map(Vec::len), Some(10));
}

#[test]
fn validate_rejects_non_object_answers() {
    let dir = TestDir::new().expect("dir");
    dir.write_json("customer_defaults.json", &json!([1, 2]))
        .expect("write");

    let output = eightd(&dir, &["validate"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn init_twice_requires_force() {
    let dir = TestDir::new().expect("dir");
    assert_eq!(eightd(&dir, &["init"]).status.code(), Some(exit_codes::OK));
    assert!(dir.join("eightd.toml").exists());
    assert_eq!(
        eightd(&dir, &["init"]).status.code(),
        Some(exit_codes::INVALID)
    );
    assert_eq!(
        eightd(&dir, &["init", "--force"]).status.code(),
        Some(exit_codes::OK)
    );
    assert_eq!(eightd(&dir, &["validate"]).status.code(), Some(exit_codes::OK));
}
