// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tracesync - an offline write queue that syncs to a remote store.
//!
//! Field devices enqueue writes while disconnected; a durable local queue
//! holds them and a sync engine pushes them to the remote store when
//! connectivity returns.
//!
//! # Main Components
//!
//! - [`SyncEngine`] - enqueue, sync, status and subscriptions
//! - [`sync`] - queue, connectivity monitor, submitter, notification hub
//! - [`notify`] - user-facing hooks driven by sync events
//! - [`Config`] - project configuration in `.tracesync/config.toml`
//! - [`Error`] - Error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tracesync::sync::*;
//!
//! let engine = SyncEngine::new(
//!     OfflineQueue::open(Path::new(".tracesync"), "pending_ops")?,
//!     Arc::new(ConnectivityMonitor::new()),
//!     Arc::new(WsSubmitter::new(SubmitConfig::default(), Arc::new(EnvSession))),
//!     SyncPolicy::default(),
//! );
//! engine.subscribe(|event| println!("{event:?}"));
//! engine.enqueue(OpKind::Create, "collection_events", json!({ "lot": "L-1" }))?;
//! engine.connectivity().became_online(); // sync starts
//! ```

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod notify;
pub mod sync;

pub use cli::{Cli, Command, NotifyCommand, OutputFormat};
pub use config::{find_work_dir, init_work_dir, Config};
pub use error::{Error, Result};
pub use sync::SyncEngine;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)?;
    }

    match cli.command {
        Command::Init { remote } => commands::init::run(remote),
        Command::Notify { command } => commands::notify::run(command),
        command => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_async(command))
        }
    }
}

async fn run_async(command: Command) -> Result<()> {
    match command {
        Command::Enqueue {
            kind,
            target,
            payload,
            offline,
        } => commands::enqueue::run(&kind, &target, payload, offline).await,
        Command::Sync => commands::sync::run().await,
        Command::Status { output } => commands::status::status(output).await,
        Command::List { output } => commands::status::list(output).await,
        Command::Agent => commands::agent::run().await,
        Command::Init { remote } => commands::init::run(remote),
        Command::Notify { command } => commands::notify::run(command),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
