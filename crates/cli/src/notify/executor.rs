// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hook execution in fire-and-forget mode.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

use super::config::HookConfig;
use super::payload::NotifyPayload;

/// Execute a hook script with the given payload.
///
/// Fire-and-forget: spawns the process and returns without waiting for it.
/// A detached thread feeds stdin and reaps the child, so a long-running
/// host does not accumulate exited hook processes.
/// Does not check exit codes or handle timeouts.
pub fn execute_hook(hook: &HookConfig, payload: &NotifyPayload, work_dir: &Path) -> Result<()> {
    let json = payload
        .to_json()
        .map_err(|e| Error::Config(format!("failed to serialize notify payload: {}", e)))?;

    // Project root is the parent of .tracesync/
    let project_root = work_dir.parent().unwrap_or(work_dir);

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(&hook.run)
        .current_dir(project_root)
        .env("TRACESYNC_EVENT", &payload.event)
        .env("TRACESYNC_SUMMARY", payload.summary())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::Config(format!("failed to spawn hook '{}': {}", hook.name, e)))?;

    let name = hook.name.clone();
    let reaper = std::thread::Builder::new()
        .name(format!("hook-{}", hook.name))
        .spawn(move || {
            if let Some(mut stdin) = child.stdin.take() {
                // Best effort; the hook may not read stdin at all.
                let _ = stdin.write_all(json.as_bytes());
            }
            match child.wait() {
                Ok(status) => tracing::debug!(hook = %name, %status, "hook exited"),
                Err(e) => tracing::warn!(hook = %name, error = %e, "failed to wait for hook"),
            }
        });
    if let Err(e) = reaper {
        tracing::warn!(hook = %hook.name, error = %e, "hook started but cannot be reaped");
    }
    Ok(())
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
