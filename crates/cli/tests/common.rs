// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens here, so connects fail fast.
pub const UNREACHABLE_REMOTE: &str = "ws://127.0.0.1:1";

pub fn tsync() -> Command {
    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.env_remove("RUST_LOG");
    cmd.env("TRACESYNC_USER", "field-agent-7");
    cmd
}

/// Helper to create an initialized temp directory without a remote
pub fn init_temp_local() -> TempDir {
    let temp = TempDir::new().unwrap();
    tsync()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory whose remote is down
pub fn init_temp_unreachable() -> TempDir {
    let temp = TempDir::new().unwrap();
    tsync()
        .args(["init", "--remote", UNREACHABLE_REMOTE])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to enqueue an operation and return its ID
pub fn enqueue(temp: &TempDir, kind: &str, target: &str, payload: &str) -> String {
    let output = tsync()
        .args(["enqueue", kind, target, payload, "--offline"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn list_json(temp: &TempDir) -> serde_json::Value {
    let output = tsync()
        .args(["list", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}
