// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event name mapping for notifications.
//!
//! Maps hub events to names like "sync.completed".

use crate::sync::SyncEvent;

/// Event types users can be notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyEvent {
    SyncCompleted,
    StoreError,
    Online,
    Offline,
}

impl NotifyEvent {
    /// Get the event name as used in config (e.g., "sync.completed").
    pub fn as_event_name(&self) -> &'static str {
        match self {
            NotifyEvent::SyncCompleted => "sync.completed",
            NotifyEvent::StoreError => "sync.store_error",
            NotifyEvent::Online => "connectivity.online",
            NotifyEvent::Offline => "connectivity.offline",
        }
    }

    /// Check if a pattern matches this event.
    ///
    /// Supports exact matches, the "sync.*" and "connectivity.*" wildcards, and "*".
    pub fn matches_pattern(&self, pattern: &str) -> bool {
        if pattern == "*" || pattern == self.as_event_name() {
            return true;
        }
        match pattern.strip_suffix(".*") {
            Some(group) => self.as_event_name().split('.').next() == Some(group),
            None => false,
        }
    }

    /// Maps a hub event. Pending count changes are not user-facing.
    pub fn from_sync_event(event: &SyncEvent) -> Option<Self> {
        match event {
            SyncEvent::SyncCompleted(_) => Some(NotifyEvent::SyncCompleted),
            SyncEvent::StoreError { .. } => Some(NotifyEvent::StoreError),
            SyncEvent::ConnectivityChanged { online: true } => Some(NotifyEvent::Online),
            SyncEvent::ConnectivityChanged { online: false } => Some(NotifyEvent::Offline),
            SyncEvent::PendingCountChanged { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
