// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notification settings.

use serde::{Deserialize, Serialize};

/// A single hook definition from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Identifier for the hook.
    pub name: String,
    /// Event patterns to trigger on (e.g., "sync.completed", "connectivity.*").
    pub events: Vec<String>,
    /// Command to execute when the hook triggers.
    pub run: String,
}

impl HookConfig {
    pub fn matches(&self, event: super::NotifyEvent) -> bool {
        self.events
            .iter()
            .any(|pattern| event.matches_pattern(pattern))
    }
}

/// The `[notify]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// One-time permission grant. Hooks never run while false.
    #[serde(default)]
    pub granted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<HookConfig>,
}

impl NotifyConfig {
    /// True when granted and at least one hook is configured.
    pub fn is_active(&self) -> bool {
        self.granted && !self.hooks.is_empty()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
