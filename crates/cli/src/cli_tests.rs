// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use yare::parameterized;

/// Helper to parse CLI args into a Cli struct.
fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_init_with_remote() {
    let cli = parse(&["tsync", "init", "--remote", "ws://localhost:7890"]).unwrap();
    match cli.command {
        Command::Init { remote } => assert_eq!(remote.as_deref(), Some("ws://localhost:7890")),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_init_local_only() {
    let cli = parse(&["tsync", "init"]).unwrap();
    assert!(matches!(cli.command, Command::Init { remote: None }));
}

#[test]
fn test_enqueue_full() {
    let cli = parse(&[
        "tsync",
        "enqueue",
        "create",
        "collection_events",
        r#"{"lot":"L-1"}"#,
        "--offline",
    ])
    .unwrap();
    match cli.command {
        Command::Enqueue {
            kind,
            target,
            payload,
            offline,
        } => {
            assert_eq!(kind, "create");
            assert_eq!(target, "collection_events");
            assert_eq!(payload.as_deref(), Some(r#"{"lot":"L-1"}"#));
            assert!(offline);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_enqueue_payload_optional() {
    let cli = parse(&["tsync", "enqueue", "delete", "farmers"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Enqueue {
            payload: None,
            offline: false,
            ..
        }
    ));
}

#[test]
fn test_enqueue_rejects_blank_target() {
    assert!(parse(&["tsync", "enqueue", "create", "  "]).is_err());
}

#[parameterized(
    default_text = { &["tsync", "status"], OutputFormat::Text },
    json_short = { &["tsync", "status", "-o", "json"], OutputFormat::Json },
    json_long = { &["tsync", "status", "--output", "json"], OutputFormat::Json },
)]
fn test_status_output(args: &[&str], expected: OutputFormat) {
    match parse(args).unwrap().command {
        Command::Status { output } => assert_eq!(output, expected),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_list_json() {
    let cli = parse(&["tsync", "list", "-o", "json"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::List {
            output: OutputFormat::Json
        }
    ));
}

#[test]
fn test_invalid_output_format() {
    assert!(parse(&["tsync", "list", "-o", "yaml"]).is_err());
}

#[parameterized(
    enable = { "enable", NotifyCommand::Enable },
    disable = { "disable", NotifyCommand::Disable },
)]
fn test_notify_subcommands(arg: &str, expected: NotifyCommand) {
    match parse(&["tsync", "notify", arg]).unwrap().command {
        Command::Notify { command } => assert_eq!(command, expected),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["tsync", "sync", "-C", "/tmp/project", "-v"]).unwrap();
    assert_eq!(cli.directory.as_deref(), Some("/tmp/project"));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Command::Sync));
}

#[test]
fn test_agent_parses() {
    assert!(matches!(parse(&["tsync", "agent"]).unwrap().command, Command::Agent));
}

#[test]
fn test_missing_subcommand_is_error() {
    assert!(parse(&["tsync"]).is_err());
}
