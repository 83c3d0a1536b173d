// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Holds the applied-operation log and the record map it produces, behind
//! one async mutex so dedup and apply are a single step.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use ts_core::{jsonl, CallerIdentity, OpId, OpKind, PendingOperation, Result};

const APPLIED_FILE_NAME: &str = "applied.jsonl";

/// One line of `applied.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedEntry {
    pub op: PendingOperation,
    pub identity: CallerIdentity,
    pub applied_at: DateTime<Utc>,
}

/// Result of applying a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    New,
    Duplicate,
}

/// Shared server state.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<Mutex<Store>>,
}

struct Store {
    log_path: PathBuf,
    applied: HashSet<OpId>,
    /// target -> record key -> latest payload
    records: HashMap<String, HashMap<String, Value>>,
}

impl ServerState {
    /// Opens the state in `data_dir`, replaying any existing log.
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let log_path = data_dir.join(APPLIED_FILE_NAME);
        let entries: Vec<AppliedEntry> = jsonl::read_all(&log_path)?;

        let mut store = Store {
            log_path,
            applied: HashSet::new(),
            records: HashMap::new(),
        };
        for entry in &entries {
            store.apply_effect(&entry.op);
            store.applied.insert(entry.op.id().clone());
        }
        tracing::info!(replayed = entries.len(), "state loaded");

        Ok(ServerState {
            inner: Arc::new(Mutex::new(store)),
        })
    }

    /// Applies an operation once per op id.
    ///
    /// The log is appended before the record map changes, so a crash never
    /// leaves an effect that a restart would not replay.
    pub async fn apply(&self, op: PendingOperation, identity: CallerIdentity) -> Result<Applied> {
        let mut store = self.inner.lock().await;
        if store.applied.contains(op.id()) {
            return Ok(Applied::Duplicate);
        }

        let entry = AppliedEntry {
            op,
            identity,
            applied_at: Utc::now(),
        };
        jsonl::append(&store.log_path, &entry)?;
        store.apply_effect(&entry.op);
        store.applied.insert(entry.op.id().clone());
        Ok(Applied::New)
    }

    /// Number of distinct operations applied.
    pub async fn applied_count(&self) -> usize {
        self.inner.lock().await.applied.len()
    }

    /// Current payload of a record, if it exists.
    #[cfg(test)]
    pub async fn record(&self, target: &str, key: &str) -> Option<Value> {
        let store = self.inner.lock().await;
        store.records.get(target)?.get(key).cloned()
    }

    /// Number of records in a target.
    #[cfg(test)]
    pub async fn record_count(&self, target: &str) -> usize {
        let store = self.inner.lock().await;
        store.records.get(target).map_or(0, HashMap::len)
    }
}

impl Store {
    fn apply_effect(&mut self, op: &PendingOperation) {
        let key = record_key(op);
        match op.kind() {
            OpKind::Create | OpKind::Update => {
                self.records
                    .entry(op.target().to_string())
                    .or_default()
                    .insert(key, op.payload().clone());
            }
            OpKind::Delete => {
                if let Some(records) = self.records.get_mut(op.target()) {
                    records.remove(&key);
                }
            }
        }
    }
}

/// `payload.id` when present, otherwise the op id.
fn record_key(op: &PendingOperation) -> String {
    match op.payload().get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => op.id().to_string(),
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
