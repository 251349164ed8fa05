//! CLI error specs

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    Project::empty().oplog().args(&["frobnicate"]).fails();
}

#[test]
fn unknown_format_fails() {
    Project::empty()
        .oplog()
        .args(&["--format", "xml", "nth-prime", "3"])
        .fails()
        .stderr_has("xml");
}

#[test]
fn missing_config_file_fails() {
    Project::empty()
        .oplog()
        .args(&["--config", "nope.toml", "nth-prime", "3"])
        .fails()
        .stderr_has("config error");
}

#[test]
fn find_prime_rejects_zero() {
    Project::empty()
        .oplog()
        .args(&["find-prime", "0"])
        .fails()
        .stderr_has("not in 1..");
}

#[test]
fn nth_prime_rejects_zero() {
    Project::empty()
        .oplog()
        .args(&["nth-prime", "0"])
        .fails()
        .stderr_has("not in 1..");
}
