// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing sync notifications.
//!
//! This module provides:
//! - Configuration under `[notify]` in `.tracesync/config.toml`
//! - Event name mapping from [`SyncEvent`](crate::sync::SyncEvent) to names like "sync.completed"
//! - Payload building for hook stdin
//! - Fire-and-forget hook execution
//!
//! Nothing runs until the user grants permission (`tsync notify enable`).
//!
//! # Configuration Format
//!
//! ```toml
//! [notify]
//! granted = true
//!
//! [[notify.hooks]]
//! name = "toast"
//! events = ["sync.completed", "connectivity.*"]
//! run = "notify-send tracesync \"$TRACESYNC_SUMMARY\""
//! ```

pub mod config;
pub mod event;
pub mod executor;
pub mod payload;
pub mod runner;

pub use config::{HookConfig, NotifyConfig};
pub use event::NotifyEvent;
pub use executor::execute_hook;
pub use payload::NotifyPayload;
pub use runner::attach;
