// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Extension points for retry and queue-size behaviour.
//!
//! The defaults retry every failed operation on every cycle and put no cap
//! on the queue. Hosts that need a different policy plug it in here.

use std::sync::Arc;

use ts_core::PendingOperation;

/// Decides whether an operation should be submitted in the current cycle.
///
/// Declined operations stay in the queue untouched; they are reported as
/// `deferred` in the cycle outcome and offered to the policy again next time.
pub trait RetryPolicy: Send + Sync {
    /// `previous_failures` counts failed submissions of `op` since this
    /// engine started.
    fn should_attempt(&self, op: &PendingOperation, previous_failures: u32) -> bool;
}

/// Attempt every operation on every cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct RetryForever;

impl RetryPolicy for RetryForever {
    fn should_attempt(&self, _op: &PendingOperation, _previous_failures: u32) -> bool {
        true
    }
}

impl<F> RetryPolicy for F
where
    F: Fn(&PendingOperation, u32) -> bool + Send + Sync,
{
    fn should_attempt(&self, op: &PendingOperation, previous_failures: u32) -> bool {
        self(op, previous_failures)
    }
}

/// Engine behaviour knobs.
#[derive(Clone)]
pub struct SyncPolicy {
    /// Start a sync cycle right after an enqueue when online.
    pub sync_on_enqueue: bool,
    /// Refuse new operations once this many are pending. `None` = unbounded.
    pub max_pending: Option<usize>,
    pub retry: Arc<dyn RetryPolicy>,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        SyncPolicy {
            sync_on_enqueue: true,
            max_pending: None,
            retry: Arc::new(RetryForever),
        }
    }
}

impl std::fmt::Debug for SyncPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPolicy")
            .field("sync_on_enqueue", &self.sync_on_enqueue)
            .field("max_pending", &self.max_pending)
            .finish_non_exhaustive()
    }
}
