// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote submission client.
//!
//! Turns one pending operation into one remote write and reports success or
//! failure. The orchestrator treats every failure the same way (keep the op
//! queued); the error variants exist for logging.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use ts_core::protocol::{ClientMessage, ServerMessage};
use ts_core::{CallerIdentity, PendingOperation};

use super::session::SessionProvider;
use super::transport::{Transport, TransportError, WebSocketTransport};

/// Error type for a single submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// No signed-in caller to submit on behalf of.
    #[error("no caller identity available")]
    NoIdentity,

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The remote store refused the operation.
    #[error("rejected by remote: {0}")]
    Rejected(String),

    /// The remote reported an error not tied to the operation.
    #[error("remote error: {0}")]
    Remote(String),

    /// No answer within the configured time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The connection closed before the remote answered.
    #[error("connection closed before a reply")]
    NoReply,
}

/// Boxed future returned by [`RemoteSubmitter::submit`].
pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send + 'a>>;

/// Executes one queued operation against the remote store.
pub trait RemoteSubmitter: Send + Sync {
    fn submit<'a>(&'a self, op: &'a PendingOperation) -> SubmitFuture<'a>;
}

/// Configuration for the WebSocket submitter.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// URL of the remote store.
    pub url: String,
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
    /// Maximum time to wait for the answer to one submission.
    pub submit_timeout: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        SubmitConfig {
            url: "ws://localhost:7890".to_string(),
            connect_timeout: Duration::from_secs(5),
            submit_timeout: Duration::from_secs(10),
        }
    }
}

/// Submits operations over a [`Transport`], one request/answer pair each.
///
/// Connects lazily. Any failure drops the connection so the next submission
/// starts from a fresh one.
pub struct WsSubmitter<T: Transport = WebSocketTransport> {
    config: SubmitConfig,
    transport: Mutex<T>,
    session: Arc<dyn SessionProvider>,
}

impl WsSubmitter<WebSocketTransport> {
    /// Create a submitter with the default WebSocket transport.
    pub fn new(config: SubmitConfig, session: Arc<dyn SessionProvider>) -> Self {
        Self::with_transport(config, WebSocketTransport::new(), session)
    }
}

impl<T: Transport> WsSubmitter<T> {
    /// Create a submitter with a custom transport (for testing).
    pub fn with_transport(
        config: SubmitConfig,
        transport: T,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        WsSubmitter {
            config,
            transport: Mutex::new(transport),
            session,
        }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Connects now instead of on the first submission.
    ///
    /// Hosts use this as their reachability check before reporting online.
    pub async fn connect(&self) -> Result<(), SubmitError> {
        let mut transport = self.transport.lock().await;
        self.ensure_connected(&mut *transport).await
    }

    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_connected()
    }

    /// Closes the connection, if any.
    pub async fn disconnect(&self) -> Result<(), SubmitError> {
        self.transport.lock().await.disconnect().await?;
        Ok(())
    }

    async fn ensure_connected(&self, transport: &mut T) -> Result<(), SubmitError> {
        if transport.is_connected() {
            return Ok(());
        }
        let timeout = self.config.connect_timeout;
        tokio::time::timeout(timeout, transport.connect(&self.config.url))
            .await
            .map_err(|_| SubmitError::Timeout(timeout))??;
        tracing::debug!(url = %self.config.url, "connected to remote");
        Ok(())
    }

    async fn submit_op(&self, op: &PendingOperation) -> Result<(), SubmitError> {
        let identity = self
            .session
            .current_identity()
            .ok_or(SubmitError::NoIdentity)?;

        let mut transport = self.transport.lock().await;
        self.ensure_connected(&mut *transport).await?;

        let timeout = self.config.submit_timeout;
        let answer = tokio::time::timeout(timeout, exchange(&mut *transport, op, identity)).await;
        let result = answer.unwrap_or(Err(SubmitError::Timeout(timeout)));

        // A rejection is an answer on a healthy connection; anything else
        // leaves the stream in an unknown state.
        if matches!(
            result,
            Err(SubmitError::Transport(_) | SubmitError::Timeout(_) | SubmitError::NoReply)
        ) {
            let _ = transport.disconnect().await;
        }
        result
    }
}

impl<T: Transport> RemoteSubmitter for WsSubmitter<T> {
    fn submit<'a>(&'a self, op: &'a PendingOperation) -> SubmitFuture<'a> {
        Box::pin(self.submit_op(op))
    }
}

/// Sends one submission and waits for the answer carrying its op id.
async fn exchange<T: Transport>(
    transport: &mut T,
    op: &PendingOperation,
    identity: CallerIdentity,
) -> Result<(), SubmitError> {
    transport
        .send(ClientMessage::submit(op.clone(), identity))
        .await?;

    loop {
        match transport.recv().await? {
            Some(ServerMessage::Ack { id, duplicate }) if &id == op.id() => {
                if duplicate {
                    tracing::debug!(%id, "remote already had operation");
                }
                return Ok(());
            }
            Some(ServerMessage::Rejected { id, reason }) if &id == op.id() => {
                return Err(SubmitError::Rejected(reason));
            }
            Some(ServerMessage::Error { message }) => return Err(SubmitError::Remote(message)),
            Some(other) => {
                tracing::debug!(?other, "ignoring unrelated message");
            }
            None => return Err(SubmitError::NoReply),
        }
    }
}
