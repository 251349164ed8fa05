// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn headless(total: Option<u64>) -> ProgressIndicator {
    ProgressIndicator::new("test_op", total, true, 0, None, &Terminal::disabled())
}

#[test]
fn ratio_tracks_completed_over_total() {
    let mut progress = headless(Some(10));
    assert_eq!(progress.completion_ratio(), Some(0.0));

    progress.progress(1).unwrap();
    assert_eq!(progress.completion_ratio(), Some(0.1));

    progress.progress(5).unwrap();
    assert_eq!(progress.completion_ratio(), Some(0.6));
    assert_eq!(progress.completed(), 6);
}

#[test]
fn success_forces_full_ratio() {
    let mut progress = headless(Some(10));
    progress.progress(3).unwrap();
    progress.finish(true);
    assert_eq!(progress.completion_ratio(), Some(1.0));
    assert_eq!(progress.completed(), 10);
}

#[test]
fn failure_with_total_keeps_last_ratio() {
    let mut progress = headless(Some(4));
    progress.progress(1).unwrap();
    progress.finish(false);
    assert_eq!(progress.completion_ratio(), Some(0.25));
    assert_eq!(progress.completed(), 1);
}

#[test]
fn ratio_never_exceeds_one() {
    let mut progress = headless(Some(2));
    progress.progress(5).unwrap();
    assert_eq!(progress.completion_ratio(), Some(1.0));
}

#[test]
fn progress_without_total_or_bar_is_unavailable() {
    let mut progress = headless(None);
    assert!(!progress.is_rendering());

    let err = progress.progress(1).unwrap_err();
    assert_eq!(
        err,
        OplogError::ProgressUnavailable {
            operation: "test_op".to_string()
        }
    );
    assert_eq!(progress.completed(), 0);
}

#[test]
fn hidden_bar_when_bar_not_requested() {
    let term = Terminal::capture();
    let progress = ProgressIndicator::new("test_op", Some(3), false, 0, None, &term);
    assert!(!progress.is_rendering());
    assert!(progress.group().is_none());
}

#[test]
fn unbounded_bar_accepts_progress_and_fails_to_undefined_ratio() {
    let term = Terminal::capture();
    let mut progress = ProgressIndicator::new("test_op", None, true, 0, None, &term);
    assert!(progress.is_rendering());

    progress.progress(1).unwrap();
    progress.progress(2).unwrap();
    assert_eq!(progress.completed(), 3);

    progress.finish(false);
    assert_eq!(progress.completion_ratio(), None);
    assert!(!progress.is_rendering());
}

#[test]
fn unbounded_success_still_completes() {
    let term = Terminal::capture();
    let mut progress = ProgressIndicator::new("test_op", None, true, 0, None, &term);
    progress.finish(true);
    assert_eq!(progress.completion_ratio(), Some(1.0));
}

#[test]
fn nested_bar_joins_parent_group() {
    let term = Terminal::capture();
    let mut parent = ProgressIndicator::new("parent", Some(2), true, 0, None, &term);
    let group = parent.group();
    assert!(group.is_some());

    let mut child = ProgressIndicator::new("child", Some(5), true, 1, group, &term);
    assert_eq!(child.nesting_level(), 1);
    child.progress(5).unwrap();
    child.finish(true);
    parent.finish(true);

    assert_eq!(child.completion_ratio(), Some(1.0));
    assert_eq!(parent.completion_ratio(), Some(1.0));
}

#[test]
fn description_indents_per_level() {
    assert_eq!(indented_description("find", 0), "find");
    assert_eq!(indented_description("find", 1), "-- find");
    assert_eq!(indented_description("find", 2), "----  find");
}
