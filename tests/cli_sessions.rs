#![allow(deprecated)]

/// End-to-end tests for the `sessions` command family
///
/// Every test points the binary at a private storage directory and a config
/// path that does not exist, so only defaults and flags are in effect.
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;
mod common;

fn gramcheck(tmp: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gramcheck").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("GRAMCHECK_ENV")
        .env_remove("GRAMCHECK_STORAGE_BACKEND")
        .env_remove("GRAMCHECK_STORAGE_DIR")
        .env_remove("GRAMCHECK_STORAGE_PATH")
        .env_remove("GRAMCHECK_SESSIONS_KEY")
        .env_remove("GRAMCHECK_CURRENT_SESSION_KEY")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(tmp.join("missing.yaml"))
        .arg("--storage-path")
        .arg(tmp.join("store"));
    cmd
}

fn current_id(tmp: &Path) -> String {
    let output = gramcheck(tmp)
        .args(["sessions", "current"])
        .output()
        .expect("run current");
    String::from_utf8(output.stdout)
        .expect("utf8")
        .trim()
        .to_string()
}

#[test]
fn test_list_on_empty_store() {
    let tmp = TempDir::new().unwrap();
    gramcheck(tmp.path())
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No chat sessions found."));
}

#[test]
fn test_new_select_message_and_delete() {
    let tmp = TempDir::new().unwrap();

    gramcheck(tmp.path())
        .args(["sessions", "new", "--title", "Cover letter", "--select"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created session"));

    let id = current_id(tmp.path());
    assert!(!id.is_empty());

    gramcheck(tmp.path())
        .args(["sessions", "add-message", &id, "He go to school."])
        .assert()
        .success();

    gramcheck(tmp.path())
        .args(["sessions", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cover letter"))
        .stdout(predicate::str::contains("He go to school."));

    gramcheck(tmp.path())
        .args(["sessions", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions: 1"));

    gramcheck(tmp.path())
        .args(["sessions", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted session"));

    gramcheck(tmp.path())
        .args(["sessions", "current"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No current session."));
}

#[test]
fn test_list_json_output() {
    let tmp = TempDir::new().unwrap();
    gramcheck(tmp.path())
        .args(["sessions", "new", "--title", "Essay"])
        .assert()
        .success();

    let output = gramcheck(tmp.path())
        .args(["sessions", "list", "--json"])
        .output()
        .expect("run list");
    assert!(output.status.success());

    let sessions: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let sessions = sessions.as_array().expect("array");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["title"], "Essay");
    assert!(sessions[0]["createdAt"].is_string());
}

#[test]
fn test_rename_unknown_session_fails() {
    let tmp = TempDir::new().unwrap();
    gramcheck(tmp.path())
        .args(["sessions", "rename", "ghost", "New title"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session not found: ghost"));
}

#[test]
fn test_add_message_rejects_unknown_role() {
    let tmp = TempDir::new().unwrap();
    gramcheck(tmp.path())
        .args(["sessions", "new", "--select"])
        .assert()
        .success();
    let id = current_id(tmp.path());

    gramcheck(tmp.path())
        .args(["sessions", "add-message", &id, "--role", "bot", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_clear_removes_everything() {
    let tmp = TempDir::new().unwrap();
    gramcheck(tmp.path())
        .args(["sessions", "new", "--select"])
        .assert()
        .success();

    gramcheck(tmp.path())
        .args(["sessions", "clear"])
        .assert()
        .success();

    gramcheck(tmp.path())
        .args(["sessions", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions: 0"))
        .stdout(predicate::str::contains("Size:     0 bytes"));
}

#[test]
fn test_sqlite_backend_from_config_file() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("sessions.db");
    let (_config_dir, config_path) = common::temp_config_file(&format!(
        "storage:\n  backend: sqlite\n  path: {}\n",
        db.display()
    ));

    let mut cmd = Command::cargo_bin("gramcheck").unwrap();
    cmd.env_remove("GRAMCHECK_STORAGE_BACKEND")
        .env_remove("GRAMCHECK_STORAGE_DIR")
        .env_remove("GRAMCHECK_STORAGE_PATH")
        .arg("--config")
        .arg(&config_path)
        .args(["sessions", "new", "--title", "Stored in sqlite"])
        .assert()
        .success();

    assert!(db.exists());
}

#[test]
fn test_invalid_backend_is_rejected() {
    let tmp = TempDir::new().unwrap();
    gramcheck(tmp.path())
        .args(["--backend", "floppy", "sessions", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid storage backend"));
}

#[test]
fn test_equal_keys_fail_validation() {
    let (_tmp, config_path) = common::temp_config_file(
        "storage:\n  sessions_key: same\n  current_session_key: same\n",
    );

    let mut cmd = Command::cargo_bin("gramcheck").unwrap();
    cmd.env_remove("GRAMCHECK_SESSIONS_KEY")
        .env_remove("GRAMCHECK_CURRENT_SESSION_KEY")
        .arg("--config")
        .arg(&config_path)
        .args(["--backend", "memory", "sessions", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));
}
