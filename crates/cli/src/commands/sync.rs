// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{Host, Reach};
use crate::error::{Error, Result};
use crate::sync::{CycleResult, SkipReason};

pub async fn run() -> Result<()> {
    let host = Host::open(Reach::Connect).await?;
    let Some(remote) = host.remote() else {
        return Err(Error::NoRemote);
    };
    if !host.engine.is_online() {
        // Surface the actual connection error.
        remote.connect().await?;
        host.engine.connectivity().became_online();
    }

    match host.engine.sync_now().await {
        CycleResult::Completed(outcome) => {
            println!("synced {}, failed {}", outcome.succeeded, outcome.failed);
            if outcome.deferred > 0 {
                println!("deferred {}", outcome.deferred);
            }
        }
        CycleResult::Empty => println!("nothing to sync"),
        CycleResult::Skipped(SkipReason::Offline) => {
            println!("offline: {} pending", host.engine.pending_count()?);
        }
        CycleResult::Skipped(SkipReason::AlreadyRunning) => println!("sync already running"),
        CycleResult::StoreError(message) => return Err(Error::Store(message)),
    }
    Ok(())
}
