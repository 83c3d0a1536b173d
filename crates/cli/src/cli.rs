// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(name = "tsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline write queue with automatic sync to a remote store")]
#[command(
    long_about = "Offline write queue with automatic sync to a remote store.\n\n\
    Writes are saved locally first and pushed to the remote when it is reachable."
)]
pub struct Cli {
    /// Run as if tsync was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create .tracesync/ in the current directory
    Init {
        /// WebSocket URL of the remote store
        #[arg(long, value_name = "URL")]
        remote: Option<String>,
    },

    /// Queue a write operation
    #[command(after_help = "\
Examples:
  tsync enqueue create collection_events '{\"lot\":\"L-1\",\"kg\":12.5}'
  echo '{\"id\":\"f-1\"}' | tsync enqueue delete farmers
  tsync enqueue update farmers '{\"id\":\"f-1\"}' --offline")]
    Enqueue {
        /// Operation kind: create, update or delete
        kind: String,
        /// Target collection
        #[arg(value_parser = non_empty_string)]
        target: String,
        /// JSON payload (read from stdin when omitted)
        payload: Option<String>,
        /// Only queue; do not try to reach the remote
        #[arg(long)]
        offline: bool,
    },

    /// Push pending operations to the remote now
    Sync,

    /// Show queue and remote status
    Status {
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// List pending operations in queue order
    List {
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Keep syncing in the background until interrupted
    Agent,

    /// Grant or revoke permission for notification hooks
    Notify {
        #[command(subcommand)]
        command: NotifyCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyCommand {
    /// Allow configured hooks to run
    Enable,
    /// Stop running hooks
    Disable,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
