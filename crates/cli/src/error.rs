// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{BackgroundError, EngineError, QueueError, SubmitError};

/// All possible errors that can occur in the tracesync library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'tsync init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("no remote configured\n  hint: run 'tsync init --remote ws://host:port' or add [remote] to config.toml")]
    NoRemote,

    #[error("invalid remote URL '{0}': must start with ws:// or wss://")]
    InvalidRemoteUrl(String),

    #[error("invalid payload: {0}\n  hint: the payload must be a JSON value, e.g. '{{\"lot\": \"L-1\"}}'")]
    InvalidPayload(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("offline queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("offline queue error: {0}")]
    Store(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("remote error: {0}")]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Background(#[from] BackgroundError),

    #[error(transparent)]
    Core(#[from] ts_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for tracesync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
