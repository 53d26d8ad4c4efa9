//! Tests for config, completions and man subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use clap_complete::Shell;

#[test]
fn cli_parse_config() {
    assert!(matches!(parse(&["resq", "config"]), CliCommand::Config));
}

#[test]
fn cli_parse_completions() {
    match parse(&["resq", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    assert!(matches!(parse(&["resq", "man"]), CliCommand::Man));
}

#[test]
fn get_requires_url() {
    assert!(Cli::try_parse_from(["resq", "get"]).is_err());
}

#[test]
fn max_retries_must_be_a_number() {
    assert!(Cli::try_parse_from(["resq", "get", "http://x/", "--max-retries", "many"]).is_err());
}
