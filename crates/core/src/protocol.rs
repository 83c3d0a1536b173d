// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between the sync engine and the remote store.
//!
//! The protocol is request/response:
//! - Client submits one pending operation at a time with the caller identity
//! - Server answers with an acknowledgement or a rejection for that op id

use serde::{Deserialize, Serialize};

use crate::op::{CallerIdentity, OpId, PendingOperation};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Apply one pending operation on behalf of `identity`.
    Submit {
        op: PendingOperation,
        identity: CallerIdentity,
    },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The operation is applied on the remote store.
    Ack {
        id: OpId,
        /// True if the op had already been applied by an earlier delivery.
        #[serde(default)]
        duplicate: bool,
    },

    /// The remote store refused the operation.
    Rejected { id: OpId, reason: String },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error not tied to a specific operation (e.g. unparseable frame).
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Submit message.
    pub fn submit(op: PendingOperation, identity: CallerIdentity) -> Self {
        ClientMessage::Submit { op, identity }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Ack message.
    pub fn ack(id: OpId, duplicate: bool) -> Self {
        ServerMessage::Ack { id, duplicate }
    }

    /// Creates a Rejected message.
    pub fn rejected(id: OpId, reason: impl Into<String>) -> Self {
        ServerMessage::Rejected {
            id,
            reason: reason.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Returns the op id this message answers, if any.
    pub fn op_id(&self) -> Option<&OpId> {
        match self {
            ServerMessage::Ack { id, .. } | ServerMessage::Rejected { id, .. } => Some(id),
            ServerMessage::Pong { .. } | ServerMessage::Error { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
