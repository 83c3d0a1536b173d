// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline write queue and remote synchronization.
//!
//! Writes are made durable locally first and pushed to the remote store
//! whenever connectivity allows.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  enqueue   ┌──────────────┐  submit   ┌──────────────┐
//! │     Host     │───────────►│  SyncEngine  │──────────►│   Remote     │
//! │ (CLI, agent) │◄───────────│              │◄──────────│  Submitter   │
//! └──────────────┘  events    └──────────────┘   ack     └──────────────┘
//!        │                       │        ▲                     │
//!        │ report                ▼        │ online              ▼
//!        │               ┌──────────────┐ │              ┌──────────────┐
//!        └──────────────►│ Connectivity │─┘              │  Transport   │
//!                        │   Monitor    │                │ (WebSocket)  │
//!                        └──────────────┘                └──────────────┘
//!                                ┌──────────────┐
//!                                │ OfflineQueue │  (durable JSONL slot)
//!                                └──────────────┘
//! ```
//!
//! # Features
//!
//! - Durable queue on a key-value slot (file or memory)
//! - Single-flight sync cycles with per-operation fault isolation
//! - Automatic sync on enqueue and on offline→online transitions
//! - Observer hub for pending count, connectivity and cycle outcomes
//! - Optional background agent on a fixed interval
//! - Injectable transport and session for testing

mod background;
mod client;
mod connectivity;
mod engine;
mod hub;
mod policy;
mod queue;
mod session;
mod transport;

pub use background::{
    AgentHandle, BackgroundAgent, BackgroundError, IntervalAgent, UnavailableAgent,
};
pub use client::{RemoteSubmitter, SubmitConfig, SubmitError, SubmitFuture, WsSubmitter};
pub use connectivity::{Connectivity, ConnectivityMonitor};
pub use engine::{CycleResult, EngineError, SkipReason, SyncEngine};
pub use hub::{NotificationHub, SubscriptionHandle, SyncEvent, SyncOutcome};
pub use policy::{RetryForever, RetryPolicy, SyncPolicy};
pub use queue::{FileSlot, KeyValueSlot, MemorySlot, OfflineQueue, QueueError, QueueResult};
pub use session::{EnvSession, SessionProvider, SharedSession, StaticSession};
pub use transport::{Transport, TransportError, WebSocketTransport};

#[cfg(test)]
mod test_helpers;





#[cfg(test)]
mod hub_tests;



#[cfg(test)]
mod transport_tests;
