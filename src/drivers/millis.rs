//! Monotonic millisecond tick counter.
//!
//! Incremented once per millisecond by a compare-match interrupt while
//! enabled. Scoped to the button handler: started on entry, stopped
//! (and the peripheral powered down) on every exit path. The main
//! context only ever reads the low byte — a deliberate choice to avoid
//! a torn multi-byte load on an 8-bit core.

use portable_atomic::{AtomicU32, Ordering};

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Configure and enable the 1 ms compare-match interrupt, resetting the
/// counter to zero. `OCR0A = 125` derives from an 8 MHz clock with a
/// `/64` prescaler in CTC mode (`F_CPU / 64 / 1000`).
pub fn start() {
    MILLIS.store(0, Ordering::Relaxed);
    #[cfg(target_arch = "avr")]
    unsafe {
        use crate::drivers::hw_init::regs;

        regs::write_volatile(regs::TCNT0, 0);
        regs::write_volatile(regs::OCR0A, crate::config::MILLIS_TIMER_COMPARE);
        // CTC mode (WGM01 set), reset on compare match.
        regs::write_volatile(regs::TCCR0A, 1 << regs::WGM01);
        // clk/64 prescaler.
        regs::write_volatile(regs::TCCR0B, (1 << regs::CS01) | (1 << regs::CS00));
        regs::write_volatile(regs::TIMSK0, 1 << regs::OCIE0A);
    }
}

/// Disable the compare-match interrupt and stop the timer peripheral.
pub fn stop() {
    #[cfg(target_arch = "avr")]
    unsafe {
        use crate::drivers::hw_init::regs;

        regs::write_volatile(regs::TIMSK0, 0);
        regs::write_volatile(regs::TCCR0B, 0);
    }
}

/// Called from the timer compare-match interrupt.
pub fn on_compare_match() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

/// Milliseconds elapsed since the last `start()`.
pub fn read() -> u32 {
    MILLIS.load(Ordering::Relaxed)
}

/// Low byte of the counter — what the debounce loop polls for change.
pub fn read_low_byte() -> u8 {
    MILLIS.load(Ordering::Relaxed) as u8
}

/// Test/simulation hook: advance the counter directly instead of
/// waiting on a real interrupt.
#[cfg(not(target_arch = "avr"))]
pub fn sim_advance(ms: u32) {
    MILLIS.fetch_add(ms, Ordering::Relaxed);
}

#[cfg(not(target_arch = "avr"))]
pub fn sim_reset() {
    MILLIS.store(0, Ordering::Relaxed);
}

/// Test-only helper: ticks the counter on a background thread for the
/// duration of `f`, standing in for the real compare-match interrupt.
/// Code that busy-waits on [`read_low_byte`] changing (the button
/// debounce loop) makes real progress under this without a live 1 ms
/// hardware timer. The ticker runs flat-out (no sleep between ticks)
/// so a test driving a multi-second simulated hold still completes in
/// a small slice of real time.
#[cfg(all(test, not(target_arch = "avr")))]
pub fn with_ticking_clock<F: FnOnce()>(f: F) {
    use std::sync::atomic::{AtomicBool, Ordering as StdOrdering};
    use std::sync::Arc;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handle = Arc::clone(&stop);
    let ticker = std::thread::spawn(move || {
        while !stop_handle.load(StdOrdering::Relaxed) {
            on_compare_match();
            std::thread::yield_now();
        }
    });
    f();
    stop.store(true, StdOrdering::Relaxed);
    let _ = ticker.join();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_resets_counter() {
        MILLIS.store(42, Ordering::Relaxed);
        start();
        assert_eq!(read(), 0);
    }

    #[test]
    fn compare_match_increments() {
        start();
        on_compare_match();
        on_compare_match();
        assert_eq!(read(), 2);
    }

    #[test]
    fn low_byte_wraps_at_256() {
        start();
        for _ in 0..300 {
            on_compare_match();
        }
        assert_eq!(read(), 300);
        assert_eq!(read_low_byte(), (300u32 % 256) as u8);
    }
}
