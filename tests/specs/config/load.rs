//! Configuration file specs

use crate::prelude::*;

#[test]
fn logger_name_flows_into_records() {
    let project = Project::empty();
    project.file("oplog.toml", "logger = \"primes\"\n");

    let out = project
        .oplog()
        .args(&["--config", "oplog.toml", "--no-render", "--format", "json", "nth-prime", "2"])
        .passes();
    assert_eq!(out.records()[0]["logger"], "primes");
}

#[test]
fn log_on_start_adds_no_finished_records() {
    let project = Project::empty();
    project.file("oplog.toml", "log_on_start = true\n");

    let out = project
        .oplog()
        .args(&["--config", "oplog.toml", "--no-render", "--format", "json", "nth-prime", "2"])
        .passes();
    assert_eq!(out.records().len(), 1);
}

#[test]
fn unknown_keys_are_rejected() {
    let project = Project::empty();
    project.file("oplog.toml", "colour = true\n");

    project
        .oplog()
        .args(&["--config", "oplog.toml", "nth-prime", "2"])
        .fails()
        .stderr_has("config error");
}
