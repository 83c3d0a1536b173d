// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notification payload building for hook stdin.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sync::SyncEvent;

use super::event::NotifyEvent;

/// JSON payload passed to hook scripts via stdin.
#[derive(Debug, Clone, Serialize)]
pub struct NotifyPayload {
    /// The event that triggered this hook (e.g., "sync.completed").
    pub event: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub succeeded: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred: Option<usize>,
    /// Last known number of queued operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<usize>,
    /// Storage failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NotifyPayload {
    /// Build a payload from a hub event. `None` for events users never see.
    pub fn from_event(event: &SyncEvent, pending: Option<usize>) -> Option<Self> {
        let kind = NotifyEvent::from_sync_event(event)?;
        let mut payload = NotifyPayload {
            event: kind.as_event_name().to_string(),
            timestamp: Utc::now(),
            succeeded: None,
            failed: None,
            deferred: None,
            pending,
            message: None,
        };
        match event {
            SyncEvent::SyncCompleted(outcome) => {
                payload.succeeded = Some(outcome.succeeded);
                payload.failed = Some(outcome.failed);
                payload.deferred = Some(outcome.deferred);
            }
            SyncEvent::StoreError { message } => payload.message = Some(message.clone()),
            _ => {}
        }
        Some(payload)
    }

    /// One-line human summary, exported as `TRACESYNC_SUMMARY`.
    pub fn summary(&self) -> String {
        match self.event.as_str() {
            "sync.completed" => {
                let mut text = format!(
                    "synced {}, failed {}",
                    self.succeeded.unwrap_or(0),
                    self.failed.unwrap_or(0)
                );
                if let Some(pending) = self.pending.filter(|p| *p > 0) {
                    text.push_str(&format!(", {pending} still pending"));
                }
                text
            }
            "sync.store_error" => format!(
                "could not save offline changes: {}",
                self.message.as_deref().unwrap_or("unknown error")
            ),
            "connectivity.online" => "back online".to_string(),
            "connectivity.offline" => "offline, changes will be queued".to_string(),
            other => other.to_string(),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
