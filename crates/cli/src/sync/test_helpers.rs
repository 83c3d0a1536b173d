// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::sync::{mpsc, Notify, Semaphore};
use ts_core::{OpId, OpKind, PendingOperation};

use super::client::{RemoteSubmitter, SubmitError, SubmitFuture};
use super::connectivity::ConnectivityMonitor;
use super::engine::SyncEngine;
use super::hub::SyncEvent;
use super::policy::SyncPolicy;
use super::queue::{MemorySlot, OfflineQueue};

/// Create a test operation with a fixed ID and timestamp.
pub fn make_test_op(id: &str) -> PendingOperation {
    PendingOperation::with_id(
        OpId::from(id),
        OpKind::Create,
        "collection_events",
        json!({ "id": id, "lot": format!("lot-{id}"), "kg": 12.5 }),
        "2026-03-01T08:30:00Z".parse().unwrap(),
    )
}

/// Blocks submissions until the test releases them.
struct Gate {
    entered: Notify,
    release: Semaphore,
}

/// Remote submitter driven by the test: records every call, fails the
/// configured IDs, and optionally suspends each call on a gate.
#[derive(Default)]
pub struct ScriptedSubmitter {
    calls: Mutex<Vec<OpId>>,
    successes: Mutex<HashMap<OpId, u32>>,
    failing: Mutex<HashSet<OpId>>,
    gate: Option<Gate>,
}

impl ScriptedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each submission waits for [`release`](Self::release) before answering.
    pub fn gated() -> Self {
        ScriptedSubmitter {
            gate: Some(Gate {
                entered: Notify::new(),
                release: Semaphore::new(0),
            }),
            ..Self::default()
        }
    }

    pub fn fail(&self, id: &str) {
        self.failing.lock().unwrap().insert(OpId::from(id));
    }

    pub fn heal(&self, id: &str) {
        self.failing.lock().unwrap().remove(&OpId::from(id));
    }

    /// IDs in the order they were submitted.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Number of successful remote effects recorded for an ID.
    pub fn successes(&self, id: &str) -> u32 {
        self.successes
            .lock()
            .unwrap()
            .get(&OpId::from(id))
            .copied()
            .unwrap_or(0)
    }

    /// Waits until a gated submission is in flight.
    pub async fn wait_entered(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    /// Lets `n` gated submissions complete.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.release.add_permits(n);
        }
    }
}

impl RemoteSubmitter for ScriptedSubmitter {
    fn submit<'a>(&'a self, op: &'a PendingOperation) -> SubmitFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(op.id().clone());

            if let Some(gate) = &self.gate {
                gate.entered.notify_one();
                gate.release.acquire().await.unwrap().forget();
            }

            if self.failing.lock().unwrap().contains(op.id()) {
                return Err(SubmitError::Rejected("scripted failure".into()));
            }
            *self
                .successes
                .lock()
                .unwrap()
                .entry(op.id().clone())
                .or_insert(0) += 1;
            Ok(())
        })
    }
}

/// Engine plus the handles a test needs to drive it.
pub struct Harness {
    pub engine: SyncEngine,
    pub monitor: Arc<ConnectivityMonitor>,
    pub submitter: Arc<ScriptedSubmitter>,
    pub slot: MemorySlot,
}

impl Harness {
    pub fn new(online: bool, submitter: ScriptedSubmitter, policy: SyncPolicy) -> Self {
        Self::on_slot(MemorySlot::new(), online, submitter, policy)
    }

    pub fn on_slot(
        slot: MemorySlot,
        online: bool,
        submitter: ScriptedSubmitter,
        policy: SyncPolicy,
    ) -> Self {
        let monitor = Arc::new(ConnectivityMonitor::with_status(online));
        let submitter = Arc::new(submitter);
        let engine = SyncEngine::new(
            OfflineQueue::new(slot.clone()),
            Arc::clone(&monitor),
            submitter.clone(),
            policy,
        );
        Harness {
            engine,
            monitor,
            submitter,
            slot,
        }
    }

    /// Forwards every hub event into a channel.
    pub fn events(&self) -> mpsc::UnboundedReceiver<SyncEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.engine.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });
        rx
    }
}

/// Policy without the enqueue trigger, so tests decide when cycles run.
pub fn manual_policy() -> SyncPolicy {
    SyncPolicy {
        sync_on_enqueue: false,
        ..SyncPolicy::default()
    }
}

/// Waits for the next `SyncCompleted` event, skipping others.
pub async fn next_completion(
    rx: &mut mpsc::UnboundedReceiver<SyncEvent>,
) -> super::hub::SyncOutcome {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Some(SyncEvent::SyncCompleted(outcome)) => return outcome,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    })
    .await
    .unwrap()
}
