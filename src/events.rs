//! Interrupt-safe event flag set.
//!
//! A single 8-bit word shared between interrupt context (set only) and
//! the main event loop (clear and read). `set` is the only operation an
//! ISR calls and on this class of MCU ISRs are non-reentrant, so it
//! needs no masking of its own. `clear` is a read-modify-write and MUST
//! run with interrupts masked so a concurrently-set bit is never lost.

use core::sync::atomic::{AtomicU8, Ordering};

/// WDT — the virtual watchdog reached its target duration.
pub const WDT: u8 = 0b0000_0001;
/// BUTTON — the button pin-change interrupt fired.
pub const BUTTON: u8 = 0b0000_0010;

static FLAGS: AtomicU8 = AtomicU8::new(0);

/// Event flag set. Zero-sized — all state lives in the static word so
/// interrupt handlers, which cannot hold a reference to a stack value,
/// can reach it directly.
pub struct EventFlags;

impl EventFlags {
    pub const fn new() -> Self {
        Self
    }

    /// Bit-or `flag` into the set. Callable only from interrupt context
    /// (non-reentrant on this MCU class, so no masking needed here).
    pub fn set(&self, flag: u8) {
        FLAGS.fetch_or(flag, Ordering::Relaxed);
    }

    /// Store zero. Single-instruction atomic, no masking required.
    pub fn reset(&self) {
        FLAGS.store(0, Ordering::Relaxed);
    }

    /// Read-modify-write clearing `flag`, under a masked critical
    /// section so a concurrently-set bit is never lost.
    pub fn clear(&self, flag: u8) {
        critical_section::with(|_| {
            FLAGS.fetch_and(!flag, Ordering::Relaxed);
        });
    }

    /// Read the raw word. Used by the event loop's masked re-check.
    pub fn get(&self) -> u8 {
        FLAGS.load(Ordering::Relaxed)
    }

    pub fn is_set(&self, flag: u8) -> bool {
        self.get() & flag != 0
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset() {
        FLAGS.store(0, Ordering::SeqCst);
    }

    #[test]
    fn set_is_idempotent() {
        reset();
        let f = EventFlags::new();
        f.set(WDT);
        f.set(WDT);
        assert_eq!(f.get(), WDT);
    }

    #[test]
    fn set_two_flags_ors_together() {
        reset();
        let f = EventFlags::new();
        f.set(WDT);
        f.set(BUTTON);
        assert_eq!(f.get(), WDT | BUTTON);
    }

    #[test]
    fn clear_removes_only_that_flag() {
        reset();
        let f = EventFlags::new();
        f.set(WDT);
        f.set(BUTTON);
        f.clear(WDT);
        assert!(!f.is_set(WDT));
        assert!(f.is_set(BUTTON));
    }

    #[test]
    fn reset_clears_everything() {
        reset();
        let f = EventFlags::new();
        f.set(WDT);
        f.set(BUTTON);
        f.reset();
        assert_eq!(f.get(), 0);
    }

    #[test]
    fn starts_empty() {
        reset();
        let f = EventFlags::new();
        assert_eq!(f.get(), 0);
    }
}
