//! Virtual long-interval watchdog.
//!
//! Synthesises sleeps of up to ~24 hours from a hardware peripheral
//! whose single-shot intervals are the discrete set {1, 2, 4, 8}
//! seconds, by greedily decomposing the requested duration and
//! chaining hardware wakes.

use core::cell::RefCell;
use critical_section::Mutex;

use crate::config::WDT_INTERVALS_SECONDS;
use crate::error::HaltReason;
use crate::events::{EventFlags, WDT};
use crate::halt;

struct State {
    remaining_seconds: u32,
    current_interval_seconds: u8,
}

static STATE: Mutex<RefCell<State>> = Mutex::new(RefCell::new(State {
    remaining_seconds: 0,
    current_interval_seconds: 0,
}));

/// Largest supported hardware interval that does not exceed `remaining`.
/// `remaining` must be non-zero; calling with zero is an internal
/// invariant violation.
fn largest_supported_interval(remaining: u32) -> u8 {
    for iv in WDT_INTERVALS_SECONDS {
        if (iv as u32) <= remaining {
            return iv;
        }
    }
    halt::halt(HaltReason::IllegalWatchdogInterval)
}

/// Program the hardware watchdog for `interval_seconds`, interrupt
/// (not reset) mode, following the peripheral's documented "timed
/// change sequence": set WDCE and WDE together, then within the
/// bounded window write the prescaler and WDTIE with WDCE and WDE
/// cleared.
fn program_hardware_interval(interval_seconds: u8) {
    #[cfg(target_arch = "avr")]
    unsafe {
        use crate::drivers::hw_init::regs;

        let wdp = match interval_seconds {
            1 => 1 << regs::WDP1,
            2 => (1 << regs::WDP1) | (1 << regs::WDP0),
            4 => 1 << regs::WDP2,
            8 => 1 << regs::WDP3,
            _ => halt::halt(HaltReason::IllegalWatchdogInterval),
        };

        let wdtcr = regs::read_volatile(regs::WDTCR);
        regs::write_volatile(regs::WDTCR, wdtcr | (1 << regs::WDCE) | (1 << regs::WDE));
        regs::write_volatile(regs::WDTCR, (1 << regs::WDTIE) | wdp);
    }
    #[cfg(not(target_arch = "avr"))]
    {
        let _ = interval_seconds;
    }
}

/// Disable the hardware watchdog using the same timed change sequence.
fn disable_hardware_watchdog() {
    #[cfg(target_arch = "avr")]
    unsafe {
        use crate::drivers::hw_init::regs;

        let wdtcr = regs::read_volatile(regs::WDTCR);
        regs::write_volatile(regs::WDTCR, wdtcr | (1 << regs::WDCE) | (1 << regs::WDE));
        regs::write_volatile(regs::WDTCR, 0);
    }
}

/// Internal: must be called with the shared state's critical section
/// already held. Either arms the next hardware interval or, if the
/// countdown has reached zero, disables the hardware watchdog and
/// posts WDT.
fn configure_sleep(cs: critical_section::CriticalSection<'_>, flags: &EventFlags) {
    let mut state = STATE.borrow(cs).borrow_mut();
    if state.remaining_seconds == 0 {
        disable_hardware_watchdog();
        state.current_interval_seconds = 0;
        drop(state);
        flags.set(WDT);
        return;
    }

    let iv = largest_supported_interval(state.remaining_seconds);
    state.current_interval_seconds = iv;
    program_hardware_interval(iv);
}

/// Arm the virtual watchdog for `duration_seconds`. `arm(0)` posts WDT
/// immediately. Calling while already armed replaces the countdown.
pub fn arm(duration_seconds: u32, flags: &EventFlags) {
    critical_section::with(|cs| {
        STATE.borrow(cs).borrow_mut().remaining_seconds = duration_seconds;
        configure_sleep(cs, flags);
    });
}

/// Disable the hardware watchdog and clear the countdown. Does not
/// clear an already-posted WDT flag; callers requiring that must do so
/// separately.
pub fn cancel() {
    critical_section::with(|cs| {
        disable_hardware_watchdog();
        let mut state = STATE.borrow(cs).borrow_mut();
        state.remaining_seconds = 0;
        state.current_interval_seconds = 0;
    });
}

/// Called from the hardware-watchdog interrupt. Saturating-subtracts
/// the interval just consumed from the countdown, then rearms or posts
/// WDT.
pub fn tick(flags: &EventFlags) {
    critical_section::with(|cs| {
        {
            let mut state = STATE.borrow(cs).borrow_mut();
            let consumed = state.current_interval_seconds as u32;
            state.remaining_seconds = state.remaining_seconds.saturating_sub(consumed);
        }
        configure_sleep(cs, flags);
    });
}

/// Host/simulation test hook: the countdown remaining, in seconds.
#[cfg(not(target_arch = "avr"))]
pub fn remaining_seconds() -> u32 {
    critical_section::with(|cs| STATE.borrow(cs).borrow().remaining_seconds)
}

/// Host/simulation test hook: the currently armed hardware interval.
#[cfg(not(target_arch = "avr"))]
pub fn current_interval_seconds() -> u8 {
    critical_section::with(|cs| STATE.borrow(cs).borrow().current_interval_seconds)
}
