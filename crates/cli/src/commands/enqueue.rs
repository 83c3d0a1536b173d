// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Read;

use serde_json::Value;
use ts_core::OpKind;

use super::{Host, Reach};
use crate::error::{Error, Result};
use crate::sync::CycleResult;

pub async fn run(
    kind: &str,
    target: &str,
    payload: Option<String>,
    offline: bool,
) -> Result<()> {
    let kind: OpKind = kind.parse()?;
    let payload = match payload {
        Some(text) => parse_payload(&text)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            parse_payload(&text)?
        }
    };

    let reach = if offline { Reach::Offline } else { Reach::Connect };
    let host = Host::open(reach).await?;
    let id = host.engine.enqueue(kind, target, payload)?;
    println!("{}", id);

    if host.config.sync.sync_on_enqueue && host.engine.is_online() {
        match host.engine.sync_now().await {
            CycleResult::Completed(outcome) if outcome.failed > 0 => {
                eprintln!("warning: {} operation(s) failed to sync", outcome.failed);
            }
            CycleResult::StoreError(message) => {
                eprintln!("warning: offline queue error: {}", message);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Empty input means an empty object.
pub(crate) fn parse_payload(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(text).map_err(|e| Error::InvalidPayload(e.to_string()))
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
