// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Caller identity for remote submissions.
//!
//! Sessions are managed outside the engine; this module is the seam through
//! which the submission client asks "who is submitting right now?". No
//! identity means the submission fails and the operation stays queued.

use std::sync::{Arc, PoisonError, RwLock};

use ts_core::CallerIdentity;

/// Source of the current caller identity.
pub trait SessionProvider: Send + Sync {
    fn current_identity(&self) -> Option<CallerIdentity>;
}

/// A fixed identity (or none).
#[derive(Debug, Clone)]
pub struct StaticSession(Option<CallerIdentity>);

impl StaticSession {
    pub fn new(name: &str) -> Self {
        StaticSession(CallerIdentity::new(name))
    }

    pub fn anonymous() -> Self {
        StaticSession(None)
    }
}

impl SessionProvider for StaticSession {
    fn current_identity(&self) -> Option<CallerIdentity> {
        self.0.clone()
    }
}

/// Identity that can change at runtime, e.g. on sign-in and sign-out.
#[derive(Debug, Clone, Default)]
pub struct SharedSession(Arc<RwLock<Option<CallerIdentity>>>);

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, name: &str) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = CallerIdentity::new(name);
    }

    pub fn sign_out(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SessionProvider for SharedSession {
    fn current_identity(&self) -> Option<CallerIdentity> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Identity from the environment, for the command-line host.
///
/// Resolution order:
/// 1. `TRACESYNC_USER`
/// 2. Unix username from `USER` or `LOGNAME` (if not a system account)
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSession;

impl SessionProvider for EnvSession {
    fn current_identity(&self) -> Option<CallerIdentity> {
        if let Some(name) = env_non_empty("TRACESYNC_USER") {
            return CallerIdentity::new(name);
        }
        env_non_empty("USER")
            .or_else(|| env_non_empty("LOGNAME"))
            .filter(|name| !is_system_account(name))
            .and_then(CallerIdentity::new)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn is_system_account(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "root" | "system" | "administrator" | "admin" | "daemon" | "nobody"
    )
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
