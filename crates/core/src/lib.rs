// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ts-core: Shared library for the tracesync offline write queue
//!
//! This crate provides the data model, wire protocol, and JSONL encoding
//! used by both the `tsync` engine/CLI and the `ts-remote` store.

pub mod error;
pub mod jsonl;
pub mod op;
pub mod protocol;

pub use error::{Error, Result};
pub use op::{CallerIdentity, OpId, OpKind, PendingOperation};
