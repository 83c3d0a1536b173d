// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestrator.
//!
//! [`SyncEngine`] is the context object the host builds once and hands to
//! whoever needs to enqueue writes or watch sync status. It ties together
//! the durable queue, the connectivity monitor, the remote submitter and
//! the notification hub.
//!
//! # Sync cycle
//!
//! 1. Skip if offline or if another cycle is in flight (single-flight).
//! 2. Snapshot the queue. Operations enqueued later wait for the next cycle.
//! 3. Submit each operation in order; one failure never stops the others.
//! 4. Remove the confirmed operations by ID; failures stay queued.
//! 5. Release the guard, publish the new pending count, then the outcome.
//!
//! Delivery is at-least-once: a crash between a remote confirmation and the
//! queue update means the operation is submitted again on the next cycle.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use ts_core::{OpId, OpKind, PendingOperation};

use super::background::{AgentHandle, BackgroundAgent};
use super::client::RemoteSubmitter;
use super::connectivity::ConnectivityMonitor;
use super::hub::{NotificationHub, SubscriptionHandle, SyncEvent, SyncOutcome};
use super::policy::SyncPolicy;
use super::queue::{OfflineQueue, QueueError};

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The durable queue failed.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// The configured queue limit is reached.
    #[error("offline queue is full ({limit} pending operations)")]
    QueueFull { limit: usize },
}

/// Why a cycle did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyRunning,
    Offline,
}

/// Result of one call to [`SyncEngine::run_sync_cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleResult {
    /// The snapshot was processed.
    Completed(SyncOutcome),
    /// Nothing was queued.
    Empty,
    Skipped(SkipReason),
    /// The queue could not be read or updated.
    StoreError(String),
}

/// Holds the single-flight flag; clearing it on drop covers every exit
/// path, including a panicking submitter.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunningGuard(flag))
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct EngineInner {
    queue: OfflineQueue,
    monitor: Arc<ConnectivityMonitor>,
    submitter: Arc<dyn RemoteSubmitter>,
    hub: NotificationHub,
    policy: SyncPolicy,
    running: AtomicBool,
    /// Failed submissions per op since start, fed to the retry policy.
    failures: Mutex<HashMap<OpId, u32>>,
}

/// Offline write queue with automatic synchronization.
///
/// Cheap to clone; clones share the same engine.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

impl SyncEngine {
    /// Builds an engine and wires it to the monitor's transitions.
    pub fn new(
        queue: OfflineQueue,
        monitor: Arc<ConnectivityMonitor>,
        submitter: Arc<dyn RemoteSubmitter>,
        policy: SyncPolicy,
    ) -> Self {
        let engine = SyncEngine {
            inner: Arc::new(EngineInner {
                queue,
                monitor,
                submitter,
                hub: NotificationHub::new(),
                policy,
                running: AtomicBool::new(false),
                failures: Mutex::new(HashMap::new()),
            }),
        };
        engine.wire_connectivity();
        engine
    }

    fn wire_connectivity(&self) {
        // Weak references: the monitor must not keep a dropped engine alive.
        let weak = Arc::downgrade(&self.inner);
        self.inner.monitor.on_transition(move |status| {
            if let Some(inner) = weak.upgrade() {
                inner.hub.publish(&SyncEvent::ConnectivityChanged {
                    online: status.is_online(),
                });
            }
        });

        let weak = Arc::downgrade(&self.inner);
        self.inner.monitor.on_transition_to_online(move || {
            if let Some(inner) = weak.upgrade() {
                SyncEngine { inner }.spawn_sync("connectivity restored");
            }
        });
    }

    /// Queues a write. Returns once the operation is durable.
    ///
    /// Never reports sync results: those arrive through [`subscribe`](Self::subscribe).
    /// Fails only if the durable queue fails or the queue limit is reached.
    pub fn enqueue(
        &self,
        kind: OpKind,
        target: impl Into<String>,
        payload: serde_json::Value,
    ) -> Result<OpId, EngineError> {
        let op = PendingOperation::new(kind, target, payload);
        match self
            .inner
            .queue
            .append_bounded(&op, self.inner.policy.max_pending)
        {
            Ok(()) => {}
            Err(QueueError::Full { limit }) => {
                tracing::warn!(limit, "offline queue full, refusing operation");
                return Err(EngineError::QueueFull { limit });
            }
            Err(e) => {
                self.report_store_error(&e);
                return Err(e.into());
            }
        }
        tracing::debug!(id = %op.id(), kind = %op.kind(), target = op.target(), "operation queued");

        self.publish_pending_count();
        if self.inner.policy.sync_on_enqueue && self.is_online() {
            self.spawn_sync("enqueue");
        }
        Ok(op.id().clone())
    }

    /// Runs a sync cycle now (caller-initiated trigger).
    pub async fn sync_now(&self) -> CycleResult {
        self.run_sync_cycle().await
    }

    /// One snapshot-submit-reconcile pass over the queue.
    pub async fn run_sync_cycle(&self) -> CycleResult {
        if !self.inner.monitor.is_online() {
            return CycleResult::Skipped(SkipReason::Offline);
        }
        let Some(guard) = RunningGuard::acquire(&self.inner.running) else {
            tracing::debug!("sync already running, trigger dropped");
            return CycleResult::Skipped(SkipReason::AlreadyRunning);
        };

        let snapshot = match self.store_call(self.inner.queue.list_all()) {
            Ok(ops) => ops,
            Err(e) => return CycleResult::StoreError(e.to_string()),
        };
        if snapshot.is_empty() {
            return CycleResult::Empty;
        }

        let mut succeeded = HashSet::new();
        let mut outcome = SyncOutcome::default();
        for op in &snapshot {
            if !self
                .inner
                .policy
                .retry
                .should_attempt(op, self.failure_count(op.id()))
            {
                outcome.deferred += 1;
                continue;
            }
            match self.inner.submitter.submit(op).await {
                Ok(()) => {
                    tracing::debug!(id = %op.id(), "operation confirmed");
                    succeeded.insert(op.id().clone());
                }
                Err(e) => {
                    tracing::warn!(id = %op.id(), target = op.target(), error = %e, "submission failed, will retry");
                    self.record_failure(op.id());
                    outcome.failed += 1;
                }
            }
        }
        outcome.succeeded = succeeded.len();

        // Removal by ID keeps anything enqueued during the cycle.
        let removed = self.store_call(self.inner.queue.remove_by_ids(&succeeded));
        self.forget_failures(&succeeded);
        drop(guard);

        if let Err(e) = removed {
            return CycleResult::StoreError(e.to_string());
        }

        tracing::info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            deferred = outcome.deferred,
            "sync cycle finished"
        );
        // Count first, so observers of the outcome already see the new backlog.
        self.publish_pending_count();
        self.inner.hub.publish(&SyncEvent::SyncCompleted(outcome));
        CycleResult::Completed(outcome)
    }

    /// Host-reported connectivity.
    pub fn is_online(&self) -> bool {
        self.inner.monitor.is_online()
    }

    /// The monitor hosts report connectivity changes to.
    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.inner.monitor
    }

    /// True while a cycle holds the single-flight guard.
    pub fn is_syncing(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    pub fn pending_count(&self) -> Result<usize, EngineError> {
        Ok(self.store_call(self.inner.queue.count())?)
    }

    /// Pending operations in enqueue order.
    pub fn pending(&self) -> Result<Vec<PendingOperation>, EngineError> {
        Ok(self.store_call(self.inner.queue.list_all())?)
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&SyncEvent) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        self.inner.hub.subscribe(observer)
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.inner.hub.unsubscribe(handle)
    }

    /// Asks the host to run sync in the background.
    ///
    /// Failure is not fatal: the engine keeps syncing on foreground triggers.
    pub fn register_background(&self, agent: &dyn BackgroundAgent) -> Option<AgentHandle> {
        match agent.register(self.clone()) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "background sync unavailable, foreground only");
                None
            }
        }
    }

    /// Starts a cycle without waiting for it. Errors stay inside the task.
    fn spawn_sync(&self, reason: &'static str) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let engine = self.clone();
                handle.spawn(async move {
                    let result = engine.run_sync_cycle().await;
                    tracing::debug!(reason, ?result, "triggered sync finished");
                });
            }
            Err(_) => {
                tracing::debug!(reason, "no async runtime, sync waits for an explicit trigger");
            }
        }
    }

    /// Logs and publishes queue failures before handing them back.
    fn store_call<T>(&self, result: Result<T, QueueError>) -> Result<T, QueueError> {
        if let Err(ref e) = result {
            self.report_store_error(e);
        }
        result
    }

    fn report_store_error(&self, e: &QueueError) {
        tracing::error!(error = %e, "offline queue storage failed");
        self.inner.hub.publish(&SyncEvent::StoreError {
            message: e.to_string(),
        });
    }

    fn publish_pending_count(&self) {
        if let Ok(count) = self.store_call(self.inner.queue.count()) {
            self.inner
                .hub
                .publish(&SyncEvent::PendingCountChanged { count });
        }
    }

    fn failures(&self) -> std::sync::MutexGuard<'_, HashMap<OpId, u32>> {
        self.inner
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn failure_count(&self, id: &OpId) -> u32 {
        self.failures().get(id).copied().unwrap_or(0)
    }

    fn record_failure(&self, id: &OpId) {
        *self.failures().entry(id.clone()).or_insert(0) += 1;
    }

    fn forget_failures(&self, ids: &HashSet<OpId>) {
        let mut failures = self.failures();
        for id in ids {
            failures.remove(id);
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("online", &self.is_online())
            .field("syncing", &self.is_syncing())
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}
