// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tempfile::TempDir;
use ts_core::OpKind;

use super::*;
use crate::notify::HookConfig;
use crate::sync::{
    ConnectivityMonitor, MemorySlot, OfflineQueue, StaticSession, SubmitConfig, SyncPolicy,
    WsSubmitter,
};

fn offline_engine() -> SyncEngine {
    // Never online, so the submitter is never used.
    let submitter = WsSubmitter::new(
        SubmitConfig::default(),
        Arc::new(StaticSession::new("tester")),
    );
    SyncEngine::new(
        OfflineQueue::new(MemorySlot::new()),
        Arc::new(ConnectivityMonitor::new()),
        Arc::new(submitter),
        SyncPolicy::default(),
    )
}

fn append_hook(events: &[&str]) -> HookConfig {
    HookConfig {
        name: "record".to_string(),
        events: events.iter().map(ToString::to_string).collect(),
        run: r#"echo "$TRACESYNC_EVENT" >> events.txt"#.to_string(),
    }
}

fn read_events(path: &Path, expected: usize) -> Vec<String> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let lines: Vec<String> = std::fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect();
        if lines.len() >= expected || Instant::now() > deadline {
            return lines;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn attach_without_grant_subscribes_nothing() {
    let engine = offline_engine();
    let config = NotifyConfig {
        granted: false,
        hooks: vec![append_hook(&["*"])],
    };
    assert!(attach(&engine, &config, Path::new(".")).is_none());
}

#[test]
fn attach_without_hooks_subscribes_nothing() {
    let engine = offline_engine();
    let config = NotifyConfig {
        granted: true,
        hooks: vec![],
    };
    assert!(attach(&engine, &config, Path::new(".")).is_none());
}

#[test]
fn granted_hooks_fire_for_matching_events() {
    let dir = TempDir::new().unwrap();
    let work_dir = dir.path().join(".tracesync");
    std::fs::create_dir_all(&work_dir).unwrap();

    let engine = offline_engine();
    let config = NotifyConfig {
        granted: true,
        hooks: vec![append_hook(&["connectivity.*"])],
    };
    let handle = attach(&engine, &config, &work_dir);
    assert!(handle.is_some());

    // Pending count changes are not user-facing.
    engine
        .enqueue(OpKind::Create, "collection_events", json!({}))
        .unwrap();
    engine.connectivity().became_offline();
    engine.connectivity().report(true);
    engine.connectivity().became_offline();

    let events = read_events(&dir.path().join("events.txt"), 2);
    let mut sorted = events.clone();
    sorted.sort();
    assert_eq!(
        sorted,
        vec!["connectivity.offline", "connectivity.online"],
        "{events:?}"
    );
}
