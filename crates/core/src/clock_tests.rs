// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_advances_both_clocks() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    let w1 = clock.utc_now();
    clock.advance(Duration::from_millis(1500));
    assert_eq!(clock.now().duration_since(t1), Duration::from_millis(1500));
    assert_eq!((clock.utc_now() - w1).num_milliseconds(), 1500);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert!(t2.duration_since(t1) >= Duration::from_secs(30));
}

#[test]
fn fake_clock_wall_time_can_be_pinned() {
    let clock = FakeClock::new();
    let at = Utc.with_ymd_and_hms(2023, 6, 22, 6, 27, 53).unwrap();
    clock.set_utc(at);
    assert_eq!(clock.utc_now(), at);
}
