// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use super::*;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TestRecord {
    id: u32,
    name: String,
}

fn record(id: u32, name: &str) -> TestRecord {
    TestRecord {
        id,
        name: name.into(),
    }
}

#[test]
fn encode_writes_one_line_per_record() {
    let text = encode(&[record(1, "a"), record(2, "b")]).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.ends_with('\n'));
}

#[test]
fn encode_empty_is_empty_string() {
    let text = encode::<TestRecord>(&[]).unwrap();
    assert!(text.is_empty());
}

#[test]
fn decode_skips_blank_lines() {
    let text = "{\"id\":1,\"name\":\"a\"}\n\n   \n{\"id\":2,\"name\":\"b\"}\n";
    let records: Vec<TestRecord> = decode(text).unwrap();
    assert_eq!(records, vec![record(1, "a"), record(2, "b")]);
}

#[test]
fn decode_reports_corrupted_line() {
    let text = "{\"id\":1,\"name\":\"a\"}\nnot json\n";
    let err = decode::<TestRecord>(text).unwrap_err();
    match err {
        Error::CorruptedData(msg) => assert!(msg.starts_with("line 2")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn append_creates_file_if_missing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");

    append(&path, &record(1, "first")).unwrap();

    assert!(path.exists());
}

#[test]
fn read_all_returns_empty_for_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.jsonl");

    let records: Vec<TestRecord> = read_all(&path).unwrap();
    assert!(records.is_empty());
}

#[test]
fn append_and_read_preserves_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");

    append(&path, &record(1, "first")).unwrap();
    append(&path, &record(2, "second")).unwrap();

    let records: Vec<TestRecord> = read_all(&path).unwrap();
    assert_eq!(records, vec![record(1, "first"), record(2, "second")]);
}

#[test]
fn write_all_replaces_content_and_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");

    append(&path, &record(1, "first")).unwrap();
    write_all(&path, &[record(2, "replaced")]).unwrap();

    let records: Vec<TestRecord> = read_all(&path).unwrap();
    assert_eq!(records, vec![record(2, "replaced")]);
    assert!(!dir.path().join("test.jsonl.tmp").exists());
}

#[test]
fn write_atomic_syncs_containing_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("slots");
    fs::create_dir_all(&nested).unwrap();
    let path = nested.join("pending_ops.jsonl");

    write_atomic(&path, "{}\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    sync_parent_dir(&path).unwrap();
}

#[test]
fn sync_parent_dir_accepts_bare_file_name() {
    // A bare name lives in the current directory.
    sync_parent_dir(Path::new("pending_ops.jsonl")).unwrap();
}
