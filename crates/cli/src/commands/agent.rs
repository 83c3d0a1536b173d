// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{Host, Reach};
use crate::error::{Error, Result};
use crate::sync::{CycleResult, IntervalAgent};

/// Runs until Ctrl-C: an interval agent drains the queue and a probe on the
/// same period keeps the connectivity monitor current.
pub async fn run() -> Result<()> {
    let host = Host::open(Reach::Connect).await?;
    if host.remote().is_none() {
        return Err(Error::NoRemote);
    }
    let period = host.config.sync.background_interval();

    let Some(handle) = host.engine.register_background(&IntervalAgent::new(period)) else {
        return Err(Error::Config(
            "background_interval_secs must be greater than zero".into(),
        ));
    };
    println!(
        "Syncing every {}s to {} (Ctrl-C to stop)",
        period.as_secs(),
        host.config.remote_url().unwrap_or_default()
    );

    // Drain what is already queued instead of waiting a full period.
    if let CycleResult::Completed(outcome) = host.engine.sync_now().await {
        tracing::info!(succeeded = outcome.succeeded, failed = outcome.failed, "initial sync");
    }

    let mut probes = tokio::time::interval(period);
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
            _ = probes.tick() => host.probe().await,
        }
    }

    handle.join().await;
    println!("Stopped ({} pending)", host.engine.pending_count()?);
    Ok(())
}
