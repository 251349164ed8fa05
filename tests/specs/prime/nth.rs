//! nth-prime specs

use crate::prelude::*;

#[test]
fn progress_variant_prints_the_prime() {
    Project::empty()
        .oplog()
        .args(&["--no-render", "nth-prime", "10"])
        .passes()
        .stdout_has("Prime #10 found: 29")
        .stdout_has("[nth_prime / Success]");
}

#[test]
fn spinner_variant_records_custom_props() {
    let out = Project::empty()
        .oplog()
        .args(&["--no-render", "--format", "json", "nth-prime", "6", "--spinner"])
        .passes();

    let records = out.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["result"], "Success");
    similar_asserts::assert_eq!(
        record["custom_props"],
        serde_json::json!({ "n": 6, "prime": 13 })
    );
    assert!(record["completion_ratio"].is_null());
}
