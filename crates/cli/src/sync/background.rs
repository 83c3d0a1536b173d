// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background sync registration.
//!
//! A host that can run work while the application is idle implements
//! [`BackgroundAgent`]. The engine only asks for registration; whether and
//! how often the agent fires is up to the host.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::engine::SyncEngine;

/// Error type for background registration.
#[derive(Debug, thiserror::Error)]
pub enum BackgroundError {
    /// The host has no background execution facility.
    #[error("background sync unavailable: {0}")]
    Unavailable(String),

    /// Registration was attempted outside an async runtime.
    #[error("no async runtime to run background sync on")]
    NoRuntime,
}

/// Host facility that runs sync cycles in the background.
pub trait BackgroundAgent: Send + Sync {
    fn register(&self, engine: SyncEngine) -> Result<AgentHandle, BackgroundError>;
}

/// Keeps a background registration alive. Dropping it stops the agent.
#[derive(Debug)]
pub struct AgentHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AgentHandle {
    pub fn new(token: CancellationToken, task: Option<JoinHandle<()>>) -> Self {
        AgentHandle { token, task }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stops the agent and waits for its task to exit.
    pub async fn join(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "background sync task ended abnormally");
            }
        }
    }
}

impl Drop for AgentHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Runs a sync cycle every `period` on the current tokio runtime.
#[derive(Debug, Clone, Copy)]
pub struct IntervalAgent {
    period: Duration,
}

impl IntervalAgent {
    pub fn new(period: Duration) -> Self {
        IntervalAgent { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl BackgroundAgent for IntervalAgent {
    fn register(&self, engine: SyncEngine) -> Result<AgentHandle, BackgroundError> {
        if self.period.is_zero() {
            return Err(BackgroundError::Unavailable(
                "interval must be greater than zero".into(),
            ));
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| BackgroundError::NoRuntime)?;

        let token = CancellationToken::new();
        let child = token.clone();
        let period = self.period;
        let task = runtime.spawn(async move {
            let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            tracing::info!(?period, "background sync registered");
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticks.tick() => {
                        let result = engine.run_sync_cycle().await;
                        tracing::debug!(?result, "background sync tick");
                    }
                }
            }
            tracing::info!("background sync stopped");
        });
        Ok(AgentHandle::new(token, Some(task)))
    }
}

/// Host without background execution. Registration always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableAgent;

impl BackgroundAgent for UnavailableAgent {
    fn register(&self, _engine: SyncEngine) -> Result<AgentHandle, BackgroundError> {
        Err(BackgroundError::Unavailable(
            "host provides no background execution".into(),
        ))
    }
}
