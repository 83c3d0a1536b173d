// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod agent;
pub mod enqueue;
pub mod init;
pub mod notify;
pub mod status;
pub mod sync;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{find_work_dir, Config, QUEUE_SLOT_NAME};
use crate::error::Result;
use crate::sync::{
    ConnectivityMonitor, EnvSession, OfflineQueue, RemoteSubmitter, SubmitError, SubmitFuture,
    SyncEngine, WsSubmitter,
};
use ts_core::PendingOperation;

/// Whether a command should try to reach the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    Connect,
    Offline,
}

/// Engine plus the host adapters a CLI invocation needs.
pub struct Host {
    pub work_dir: PathBuf,
    pub config: Config,
    pub engine: SyncEngine,
    remote: Option<Arc<WsSubmitter>>,
}

impl Host {
    /// Opens the project found from the current directory.
    ///
    /// With [`Reach::Connect`] and a configured remote, the connection is
    /// attempted first and its result becomes the initial connectivity.
    pub async fn open(reach: Reach) -> Result<Self> {
        let work_dir = find_work_dir()?;
        let config = Config::load(&work_dir)?;
        let queue = OfflineQueue::open(&work_dir, QUEUE_SLOT_NAME)?;

        let remote = config.remote.as_ref().map(|remote| {
            Arc::new(WsSubmitter::new(
                remote.submit_config(),
                Arc::new(EnvSession),
            ))
        });

        let online = match (&remote, reach) {
            (Some(submitter), Reach::Connect) => match submitter.connect().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(url = submitter.url(), error = %e, "remote unreachable, working offline");
                    false
                }
            },
            _ => false,
        };

        let submitter: Arc<dyn RemoteSubmitter> = match &remote {
            Some(submitter) => Arc::clone(submitter) as Arc<dyn RemoteSubmitter>,
            None => Arc::new(LocalOnly),
        };

        // One-shot commands run their cycle explicitly and wait for it.
        let mut policy = config.sync.policy();
        policy.sync_on_enqueue = false;

        let engine = SyncEngine::new(
            queue,
            Arc::new(ConnectivityMonitor::with_status(online)),
            submitter,
            policy,
        );
        crate::notify::attach(&engine, &config.notify, &work_dir);

        Ok(Host {
            work_dir,
            config,
            engine,
            remote,
        })
    }

    pub fn remote(&self) -> Option<&Arc<WsSubmitter>> {
        self.remote.as_ref()
    }

    /// Re-checks the remote and reports the result to the monitor.
    pub async fn probe(&self) {
        let Some(submitter) = &self.remote else {
            return;
        };
        let monitor = self.engine.connectivity();
        if submitter.is_connected().await {
            monitor.became_online();
            return;
        }
        match submitter.connect().await {
            Ok(()) => monitor.became_online(),
            Err(e) => {
                tracing::debug!(error = %e, "remote still unreachable");
                monitor.became_offline();
            }
        }
    }
}

/// Submitter for projects without a remote. Never called while offline.
struct LocalOnly;

impl RemoteSubmitter for LocalOnly {
    fn submit<'a>(&'a self, _op: &'a PendingOperation) -> SubmitFuture<'a> {
        Box::pin(async { Err::<(), _>(SubmitError::Remote("no remote configured".into())) })
    }
}
