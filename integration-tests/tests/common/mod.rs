#![allow(dead_code, deprecated)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use assert_cmd::Command;

/// Stand-in for `python3`: echoes what it was asked to run, then either turns
/// into `sleep $FAKE_SLEEP` or exits with `$FAKE_EXIT` (default 0).
const FAKE_RUNTIME: &str = r#"#!/bin/sh
echo "fake-runtime args: $*"
echo "fake-runtime cwd: $(pwd)"
echo "fake-runtime env: ${MB_TEST_FORWARDED:-unset}"
if [ -n "$FAKE_SLEEP" ]; then exec sleep "$FAKE_SLEEP"; fi
exit "${FAKE_EXIT:-0}"
"#;

pub fn fake_runtime(dir: &Path) -> PathBuf {
    let path = dir.join("fake-python");
    fs::write(&path, FAKE_RUNTIME).expect("write fake runtime");
    let mut perms = fs::metadata(&path).expect("stat fake runtime").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod fake runtime");
    path
}

/// The launcher binary, isolated from the user's home and browser.
pub fn launcher(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("memory-browser"));
    cmd.env("MEMORY_BROWSER_HOME", home)
        .env("NO_COLOR", "1")
        .env("BROWSER", "true")
        .env_remove("RUST_LOG");
    cmd
}

/// Same isolation as [`launcher`], for tests that manage the process themselves.
pub fn launcher_process(home: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("memory-browser"));
    cmd.env("MEMORY_BROWSER_HOME", home)
        .env("NO_COLOR", "1")
        .env("BROWSER", "true")
        .env_remove("RUST_LOG");
    cmd
}
