#![cfg(unix)]

mod common;

use predicates::prelude::*;

use common::{fake_runtime, launcher};

#[test]
fn test_default_logging_is_human_readable() {
    let temp = tempfile::TempDir::new().unwrap();
    let runtime = fake_runtime(temp.path());

    launcher(temp.path())
        .arg("--no-browser")
        .arg("--python")
        .arg(&runtime)
        .assert()
        .success()
        .stdout(predicate::str::contains("starting server runtime"))
        .stdout(predicate::str::contains("\"level\":").not());
}

#[test]
fn test_json_logging_flag_emits_json() {
    let temp = tempfile::TempDir::new().unwrap();

    launcher(temp.path())
        .args(["--log-json", "--no-browser", "--python", "/nonexistent/python"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"level\":\"ERROR\""));
}

#[test]
fn test_pretty_logging_is_formatted() {
    let temp = tempfile::TempDir::new().unwrap();

    launcher(temp.path())
        .args([
            "--log-json",
            "--pretty",
            "--no-browser",
            "--python",
            "/nonexistent/python",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("{\n"))
        .stdout(predicate::str::contains("\"message\": \"Command failed:"));
}

#[test]
fn test_verbose_logging_adds_timestamps_and_debug() {
    let temp = tempfile::TempDir::new().unwrap();
    let runtime = fake_runtime(temp.path());

    launcher(temp.path())
        .args(["-v", "--no-browser", "--python"])
        .arg(&runtime)
        .assert()
        .success()
        .stdout(predicate::str::contains(" DEBUG "))
        .stdout(predicate::str::contains("browser opening disabled"));
}

#[test]
fn test_file_logging_captures_events() {
    let temp = tempfile::TempDir::new().unwrap();

    launcher(temp.path())
        .env("FAKE_EXIT", "3")
        .args(["--no-browser", "--python"])
        .arg(fake_runtime(temp.path()))
        .assert()
        .code(1);

    let logs_dir = temp.path().join(".memory-browser").join("logs");
    assert!(
        logs_dir.exists(),
        "Logs directory should be created at {logs_dir:?}"
    );

    let mut found_log = false;
    for entry in std::fs::read_dir(logs_dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|s| s.to_str()) == Some("log") {
            found_log = true;
            let content = std::fs::read_to_string(&path).unwrap();
            assert!(
                content.contains("\"level\":"),
                "Log file should be in JSON format"
            );
            assert!(
                content.contains("exited with status 3"),
                "Log file should capture the failure"
            );
        }
    }
    assert!(found_log, "Should have found a launch log file");
}
