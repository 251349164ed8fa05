//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_both_demos() {
    Project::empty()
        .oplog()
        .args(&["--help"])
        .passes()
        .stdout_has("find-prime")
        .stdout_has("nth-prime")
        .stdout_has("--format");
}

#[test]
fn find_prime_help_documents_failure_injection() {
    Project::empty()
        .oplog()
        .args(&["find-prime", "--help"])
        .passes()
        .stdout_has("--fail-on")
        .stdout_has("--suppress");
}
