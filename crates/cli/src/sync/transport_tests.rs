// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::transport::{Transport, TransportError, TransportFuture};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use ts_core::protocol::{ClientMessage, ServerMessage};

/// Shared view of what a [`MockTransport`] saw and will answer.
#[derive(Default)]
struct MockState {
    connected: bool,
    connects: usize,
    /// Messages that will be returned by recv().
    incoming: VecDeque<ServerMessage>,
    /// Messages that were sent via send().
    outgoing: Vec<ClientMessage>,
    connect_should_fail: bool,
    send_should_fail: bool,
    /// Answer every Submit with an Ack (or a Rejected for listed targets).
    auto_answer: bool,
    reject_targets: HashMap<String, String>,
}

/// Mock transport for testing without real sockets.
///
/// Clones share state, so a test can keep a handle after moving the
/// transport into a submitter.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that acknowledges every submission.
    pub fn answering() -> Self {
        let transport = Self::new();
        transport.state.lock().unwrap().auto_answer = true;
        transport
    }

    /// Add a message that will be returned by recv().
    pub fn queue_incoming(&self, msg: ServerMessage) {
        self.state.lock().unwrap().incoming.push_back(msg);
    }

    /// Reject submissions for `target` with `reason`.
    pub fn reject_target(&self, target: &str, reason: &str) {
        self.state
            .lock()
            .unwrap()
            .reject_targets
            .insert(target.to_string(), reason.to_string());
    }

    /// Get all messages that were sent.
    pub fn get_outgoing(&self) -> Vec<ClientMessage> {
        self.state.lock().unwrap().outgoing.clone()
    }

    /// Number of successful connects.
    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    /// Set whether connect should fail.
    pub fn set_connect_fail(&self, fail: bool) {
        self.state.lock().unwrap().connect_should_fail = fail;
    }

    /// Set whether send should fail (and drop the connection).
    pub fn set_send_fail(&self, fail: bool) {
        self.state.lock().unwrap().send_should_fail = fail;
    }
}

impl Transport for MockTransport {
    fn connect<'a>(&'a mut self, _url: &'a str) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if state.connect_should_fail {
                return Err(TransportError::ConnectionFailed("mock failure".into()));
            }
            state.connected = true;
            state.connects += 1;
            Ok(())
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            self.state.lock().unwrap().connected = false;
            Ok(())
        })
    }

    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if !state.connected {
                return Err(TransportError::ConnectionClosed);
            }
            if state.send_should_fail {
                state.connected = false;
                return Err(TransportError::SendFailed("mock failure".into()));
            }
            if state.auto_answer {
                if let ClientMessage::Submit { op, .. } = &msg {
                    let answer = match state.reject_targets.get(op.target()) {
                        Some(reason) => ServerMessage::rejected(op.id().clone(), reason.clone()),
                        None => ServerMessage::ack(op.id().clone(), false),
                    };
                    state.incoming.push_back(answer);
                }
            }
            state.outgoing.push(msg);
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if !state.connected {
                return Err(TransportError::ConnectionClosed);
            }
            Ok(state.incoming.pop_front())
        })
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }
}

#[tokio::test]
async fn test_mock_transport_connect() {
    let mut transport = MockTransport::new();
    assert!(!transport.is_connected());

    transport.connect("ws://localhost:1234").await.unwrap();
    assert!(transport.is_connected());

    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_send_recv() {
    let mut transport = MockTransport::new();
    transport.connect("ws://localhost:1234").await.unwrap();

    transport.send(ClientMessage::ping(42)).await.unwrap();

    let outgoing = transport.get_outgoing();
    assert_eq!(outgoing.len(), 1);
    assert!(matches!(outgoing[0], ClientMessage::Ping { id: 42 }));

    transport.queue_incoming(ServerMessage::pong(42));
    let received = transport.recv().await.unwrap();
    assert!(matches!(received, Some(ServerMessage::Pong { id: 42 })));

    // No more messages
    assert!(transport.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn test_mock_transport_connect_fail() {
    let mut transport = MockTransport::new();
    transport.set_connect_fail(true);

    let result = transport.connect("ws://localhost:1234").await;
    assert!(result.is_err());
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_websocket_transport_starts_disconnected() {
    let mut transport = super::transport::WebSocketTransport::new();
    assert!(!transport.is_connected());

    let err = transport.send(ClientMessage::ping(1)).await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionClosed));
}

#[tokio::test]
async fn test_websocket_transport_connect_refused() {
    // Bind then drop a listener to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut transport = super::transport::WebSocketTransport::new();
    let result = transport.connect(&format!("ws://{addr}")).await;
    assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    assert!(!transport.is_connected());
}
