// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hook runner: connects the notification config to an engine's hub.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::sync::{SubscriptionHandle, SyncEngine, SyncEvent};

use super::{execute_hook, NotifyConfig, NotifyEvent, NotifyPayload};

/// Subscribes the configured hooks to `engine`.
///
/// Returns `None` without side effects when permission is not granted or
/// no hooks are configured. Hook failures are logged and never reach the
/// engine.
pub fn attach(
    engine: &SyncEngine,
    config: &NotifyConfig,
    work_dir: &Path,
) -> Option<SubscriptionHandle> {
    if !config.granted {
        tracing::debug!("notifications not granted");
        return None;
    }
    if config.hooks.is_empty() {
        return None;
    }

    let hooks = config.hooks.clone();
    let work_dir: PathBuf = work_dir.to_path_buf();
    let pending = AtomicUsize::new(engine.pending_count().unwrap_or(0));

    let handle = engine.subscribe(move |event| {
        if let SyncEvent::PendingCountChanged { count } = event {
            pending.store(*count, Ordering::Relaxed);
        }
        let Some(kind) = NotifyEvent::from_sync_event(event) else {
            return;
        };
        let Some(payload) = NotifyPayload::from_event(event, Some(pending.load(Ordering::Relaxed)))
        else {
            return;
        };
        for hook in hooks.iter().filter(|hook| hook.matches(kind)) {
            if let Err(e) = execute_hook(hook, &payload, &work_dir) {
                tracing::warn!(hook = %hook.name, error = %e, "failed to execute notify hook");
            }
        }
    });
    Some(handle)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
