//! Command-line contract tests for the doc-harvest binary
//!
//! Every invalid day count must print usage on stdout and exit with status 4
//! before any configuration is loaded or request is made.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_doc-harvest"))
        .args(args)
        .output()
        .expect("failed to run doc-harvest")
}

fn assert_usage_exit(args: &[&str]) {
    let output = run(args);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(4), "args {:?}", args);
    assert!(
        stdout.contains("Usage: doc-harvest [OPTIONS] <DAYS>"),
        "args {:?} printed {:?}",
        args,
        stdout
    );
}

#[test]
fn test_missing_days_exits_with_usage() {
    assert_usage_exit(&[]);
}

#[test]
fn test_empty_days_exits_with_usage() {
    assert_usage_exit(&[""]);
}

#[test]
fn test_non_positive_days_exit_with_usage() {
    assert_usage_exit(&["0"]);
    assert_usage_exit(&["-3"]);
}

#[test]
fn test_non_integer_days_exit_with_usage() {
    assert_usage_exit(&["abc"]);
    assert_usage_exit(&["2.5"]);
}

#[test]
fn test_missing_days_checked_before_config() {
    assert_usage_exit(&["--config", "/nonexistent/doc-harvest.toml"]);
}

#[test]
fn test_help_is_not_a_usage_error() {
    let output = run(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("DAYS"));
}
