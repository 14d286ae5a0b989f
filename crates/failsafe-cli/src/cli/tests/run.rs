//! Tests for `run` and `config`.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_run_defaults() {
    match parse(&["failsafe", "run", "--", "curl", "-f", "https://example.com"]) {
        CliCommand::Run {
            max_attempts,
            delay_ms,
            exit_codes,
            use_async,
            command,
        } => {
            assert!(max_attempts.is_none());
            assert!(delay_ms.is_none());
            assert!(exit_codes.is_empty());
            assert!(!use_async);
            assert_eq!(command, vec!["curl", "-f", "https://example.com"]);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_with_policy_flags() {
    match parse(&[
        "failsafe",
        "run",
        "--max-attempts",
        "4",
        "--delay-ms",
        "250",
        "--exit-code",
        "75",
        "--exit-code",
        "111",
        "--async",
        "--",
        "make",
        "test",
    ]) {
        CliCommand::Run {
            max_attempts,
            delay_ms,
            exit_codes,
            use_async,
            command,
        } => {
            assert_eq!(max_attempts, Some(4));
            assert_eq!(delay_ms, Some(250));
            assert_eq!(exit_codes, vec![75, 111]);
            assert!(use_async);
            assert_eq!(command, vec!["make", "test"]);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_without_separator() {
    match parse(&["failsafe", "run", "ls", "-la"]) {
        CliCommand::Run { command, .. } => assert_eq!(command, vec!["ls", "-la"]),
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_requires_command() {
    assert!(Cli::try_parse_from(["failsafe", "run"]).is_err());
}

#[test]
fn cli_parse_config() {
    match parse(&["failsafe", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}
