//! Property-based checks of the virtual watchdog's interval schedule
//! over a wide range of requested durations.
//!
//! Runs on host only — proptest is not available for the real target.
#![cfg(not(target_arch = "avr"))]

use std::sync::Mutex;

use plant_friend::config::WDT_INTERVALS_SECONDS;
use plant_friend::drivers::watchdog;
use plant_friend::events::{EventFlags, WDT};
use proptest::prelude::*;

static LOCK: Mutex<()> = Mutex::new(());

fn greedy_decomposition(mut n: u32) -> Vec<u8> {
    let mut out = Vec::new();
    for iv in WDT_INTERVALS_SECONDS {
        while n >= iv as u32 {
            out.push(iv);
            n -= iv as u32;
        }
    }
    out
}

/// Arms the watchdog for `n` seconds and drives `tick()` until WDT
/// posts, recording the interval schedule consumed along the way.
fn run_to_completion(n: u32) -> (u32, Vec<u8>) {
    let flags = EventFlags::new();
    flags.reset();
    watchdog::cancel();
    watchdog::arm(n, &flags);

    let mut sum = 0u32;
    let mut schedule = Vec::new();
    while !flags.is_set(WDT) {
        let iv = watchdog::current_interval_seconds();
        schedule.push(iv);
        sum += iv as u32;
        watchdog::tick(&flags);
    }
    (sum, schedule)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For every requested duration, the sum of hardware intervals
    /// consumed before WDT posts equals the requested duration exactly.
    #[test]
    fn watchdog_interval_sum_equals_requested_duration(n in 1u32..=(1u32 << 20)) {
        let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (sum, _) = run_to_completion(n);
        prop_assert_eq!(sum, n);
    }

    /// The interval schedule is always the greedy {8, 4, 2, 1}
    /// decomposition of the requested duration, largest first.
    #[test]
    fn watchdog_schedule_matches_greedy_decomposition(n in 1u32..=(1u32 << 20)) {
        let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (_, schedule) = run_to_completion(n);
        let expected = greedy_decomposition(n);
        prop_assert_eq!(schedule, expected);
    }
}
