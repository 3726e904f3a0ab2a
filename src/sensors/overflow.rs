//! Reservoir overflow sensor reads.
//!
//! Active-low under an internal pull-up: a high level means "OK to
//! pump"; a low level means the reservoir is full. Grounded in
//! `original_source/event_handler/watchdog.c`'s
//! `!IS_HIGH(OVERFLOW_SIGNAL_PIN_1)` skip check, generalised to the
//! two-sensor board.

use crate::drivers::hw_init;

/// True if the overflow sensor wired to `bit` reads OK to pump.
pub fn is_ok(bit: u8) -> bool {
    hw_init::pin_is_high(bit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins;

    #[test]
    fn high_signal_is_ok_to_pump() {
        hw_init::sim_reset();
        hw_init::sim_set_external_level(pins::OVERFLOW1_BIT, true);
        assert!(is_ok(pins::OVERFLOW1_BIT));
    }

    #[test]
    fn low_signal_is_full() {
        hw_init::sim_reset();
        hw_init::sim_set_external_level(pins::OVERFLOW2_BIT, false);
        assert!(!is_ok(pins::OVERFLOW2_BIT));
    }
}
