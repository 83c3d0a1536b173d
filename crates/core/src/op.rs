// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending write operations.
//!
//! A [`PendingOperation`] is one write that a field user made while the
//! remote store may be unreachable. It is created once at enqueue time and
//! never mutated afterwards: it is either removed from the queue after the
//! remote store confirms it, or left untouched for the next attempt.
//!
//! The payload is opaque to the engine; only the remote store interprets it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Unique identifier for a pending operation.
///
/// Generated as a random UUID at enqueue time and serialized as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpId(String);

impl OpId {
    /// Generates a fresh, globally unique ID.
    pub fn generate() -> Self {
        OpId(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OpId {
    fn from(s: &str) -> Self {
        OpId(s.to_string())
    }
}

impl From<String> for OpId {
    fn from(s: String) -> Self {
        OpId(s)
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The intended effect of an operation on the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

impl OpKind {
    /// Returns the lowercase name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Create => "create",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(OpKind::Create),
            "update" => Ok(OpKind::Update),
            "delete" => Ok(OpKind::Delete),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

/// One queued write intended for the remote store.
///
/// Fields are private so an operation cannot change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    id: OpId,
    kind: OpKind,
    target: String,
    payload: serde_json::Value,
    enqueued_at: DateTime<Utc>,
}

impl PendingOperation {
    /// Creates a new operation with a fresh ID, stamped with the current time.
    pub fn new(kind: OpKind, target: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::with_id(OpId::generate(), kind, target, payload, Utc::now())
    }

    /// Creates an operation from explicit parts (used when decoding and in tests).
    pub fn with_id(
        id: OpId,
        kind: OpKind,
        target: impl Into<String>,
        payload: serde_json::Value,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        PendingOperation {
            id,
            kind,
            target: target.into(),
            payload,
            enqueued_at,
        }
    }

    pub fn id(&self) -> &OpId {
        &self.id
    }

    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// The remote collection or entity type this operation applies to.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }
}

/// Identity of the caller on whose behalf an operation is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Creates an identity, rejecting blank names.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(CallerIdentity(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
