// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Publish/subscribe hub for sync status.
//!
//! Observers run synchronously, in registration order, on the thread that
//! publishes. A panicking observer is contained: the remaining observers
//! still see the event and the publisher carries on.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Aggregate result of one sync cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// Operations confirmed by the remote store and removed from the queue.
    pub succeeded: usize,
    /// Operations whose submission failed; they stay queued.
    pub failed: usize,
    /// Operations the retry policy skipped this cycle; they stay queued.
    pub deferred: usize,
}

/// Status change broadcast to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    ConnectivityChanged { online: bool },
    PendingCountChanged { count: usize },
    SyncCompleted(SyncOutcome),
    /// The durable queue could not be read or written.
    StoreError { message: String },
}

/// Token returned by [`NotificationHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type Observer = Arc<dyn Fn(&SyncEvent) + Send + Sync>;

#[derive(Default)]
pub struct NotificationHub {
    next_id: AtomicU64,
    observers: Mutex<Vec<(SubscriptionHandle, Observer)>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer; it receives every event published afterwards.
    pub fn subscribe(
        &self,
        observer: impl Fn(&SyncEvent) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((handle, Arc::new(observer)));
        handle
    }

    /// Removes an observer. Returns false if the handle was not registered.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|(h, _)| *h != handle);
        observers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Delivers an event to every observer registered at the time of the call.
    pub fn publish(&self, event: &SyncEvent) {
        // Snapshot so observers may (un)subscribe from inside a callback.
        let observers: Vec<(SubscriptionHandle, Observer)> = self.lock().clone();
        for (handle, observer) in observers {
            if catch_unwind(AssertUnwindSafe(|| observer(event))).is_err() {
                tracing::warn!(?handle, ?event, "sync observer panicked");
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionHandle, Observer)>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
