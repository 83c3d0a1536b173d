// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use serde::Serialize;
use ts_core::PendingOperation;

use super::{Host, Reach};
use crate::cli::OutputFormat;
use crate::error::Result;

#[derive(Debug, Serialize)]
pub(crate) struct StatusReport<'a> {
    pub work_dir: &'a Path,
    pub pending: usize,
    pub remote: Option<&'a str>,
    pub notify: bool,
}

pub async fn status(output: OutputFormat) -> Result<()> {
    let host = Host::open(Reach::Offline).await?;
    let report = StatusReport {
        work_dir: &host.work_dir,
        pending: host.engine.pending_count()?,
        remote: host.config.remote_url(),
        notify: host.config.notify.granted,
    };
    println!("{}", render_status(&report, output)?);
    Ok(())
}

pub async fn list(output: OutputFormat) -> Result<()> {
    let host = Host::open(Reach::Offline).await?;
    let ops = host.engine.pending()?;
    if let Some(text) = render_list(&ops, output)? {
        println!("{}", text);
    }
    Ok(())
}

pub(crate) fn render_status(report: &StatusReport<'_>, output: OutputFormat) -> Result<String> {
    Ok(match output {
        OutputFormat::Json => serde_json::to_string(report)?,
        OutputFormat::Text => format!(
            "pending: {}\nremote: {}\nnotifications: {}\nwork dir: {}",
            report.pending,
            report.remote.unwrap_or("none (local only)"),
            if report.notify { "on" } else { "off" },
            report.work_dir.display()
        ),
    })
}

/// `None` when there is nothing to print in text mode.
pub(crate) fn render_list(ops: &[PendingOperation], output: OutputFormat) -> Result<Option<String>> {
    Ok(match output {
        OutputFormat::Json => Some(serde_json::to_string_pretty(ops)?),
        OutputFormat::Text if ops.is_empty() => None,
        OutputFormat::Text => Some(
            ops.iter()
                .map(|op| {
                    format!(
                        "{}  {:<6}  {}  {}",
                        op.id(),
                        op.kind().as_str(),
                        op.target(),
                        op.enqueued_at().format("%Y-%m-%d %H:%M:%S")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    })
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
