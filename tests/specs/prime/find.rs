//! find-prime specs

use crate::prelude::*;

#[test]
fn prints_the_prime_and_one_line_per_record() {
    Project::empty()
        .oplog()
        .args(&["--no-render", "find-prime", "4"])
        .passes()
        .stdout_has("Prime #4 found: 7")
        .stdout_has("[find_prime / Success]")
        .stdout_has("[is_prime / Success]")
        .stdout_has("[modulo / Success]");
}

#[test]
fn json_records_share_one_correlation() {
    let out = Project::empty()
        .oplog()
        .args(&["--no-render", "--format", "json", "find-prime", "3"])
        .passes()
        .stdout_lacks("Prime #");

    let records = out.records();
    let root = records.last().unwrap();
    assert_eq!(root["name"], "find_prime");
    assert_eq!(root["completion_ratio"], 1.0);
    assert!(root["parent_id"].is_null());
    for record in &records {
        assert_eq!(record["correlation_id"], root["correlation_id"]);
        assert_eq!(record["global_props"]["command"], "find-prime");
    }
}

#[test]
fn injected_failure_exits_nonzero_and_still_logs() {
    Project::empty()
        .oplog()
        .args(&["--no-render", "find-prime", "5", "--fail-on", "4"])
        .fails()
        .stdout_has("[is_prime / Failure] PrimeError: injected failure while checking 4")
        .stdout_has("[find_prime / Failure]")
        .stderr_has("injected failure while checking 4");
}

#[test]
fn suppressed_failure_still_finds_a_prime() {
    Project::empty()
        .oplog()
        .args(&["--no-render", "find-prime", "3", "--fail-on", "4", "--suppress"])
        .passes()
        .stdout_has("[is_prime / Failure]")
        .stdout_has("[find_prime / Success]")
        .stdout_has("Prime #3 found: 5");
}

#[test]
fn tracing_sink_logs_records_when_enabled() {
    Project::empty()
        .oplog()
        .env("OPLOG_LOG", "info")
        .args(&["--no-render", "find-prime", "1"])
        .passes()
        .stderr_has("operation succeeded")
        .stderr_has("find_prime");
}
