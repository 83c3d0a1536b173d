// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Host-reported connectivity.
//!
//! The monitor only mirrors what the host says. It never probes the remote
//! store itself: a host that claims to be online while the remote is down
//! shows up later as submission failures, not as a monitor error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Connectivity as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        self == Connectivity::Online
    }
}

impl From<bool> for Connectivity {
    fn from(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }
}

type TransitionCallback = Arc<dyn Fn(Connectivity) + Send + Sync>;

/// Tracks host connectivity and notifies listeners on real transitions.
pub struct ConnectivityMonitor {
    /// Current status (atomic for lock-free reads).
    online: AtomicBool,
    callbacks: Mutex<Vec<TransitionCallback>>,
}

impl ConnectivityMonitor {
    /// Create a monitor that starts offline.
    pub fn new() -> Self {
        Self::with_status(false)
    }

    /// Create a monitor with a known initial status.
    pub fn with_status(online: bool) -> Self {
        ConnectivityMonitor {
            online: AtomicBool::new(online),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Current host-reported connectivity.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn status(&self) -> Connectivity {
        self.is_online().into()
    }

    /// Host event: the network became available.
    pub fn became_online(&self) {
        self.report(true);
    }

    /// Host event: the network went away.
    pub fn became_offline(&self) {
        self.report(false);
    }

    /// Records a host report. Callbacks run only when the status flips;
    /// repeated reports of the same status are ignored.
    pub fn report(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::AcqRel);
        if previous == online {
            return;
        }

        let status = Connectivity::from(online);
        tracing::debug!(?status, "connectivity changed");

        // Clone the list so callbacks may register further callbacks.
        let callbacks = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for callback in callbacks {
            callback(status);
        }
    }

    /// Registers a callback for every status flip.
    pub fn on_transition(&self, callback: impl Fn(Connectivity) + Send + Sync + 'static) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    /// Registers a callback invoked once per offline→online transition.
    pub fn on_transition_to_online(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.on_transition(move |status| {
            if status.is_online() {
                callback();
            }
        });
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("online", &self.is_online())
            .finish_non_exhaustive()
    }
}
