//! Pump actuation and the triple-flash "skip" indicator.
//!
//! Pumps are plain digital outputs on this reference board — no PWM,
//! no H-bridge. The triple-flash reuses the pump pin itself to signal
//! a skipped watering cycle, exploiting that a few 100 ms pulses have
//! no appreciable hydraulic effect.

use crate::config::{TRIPLE_FLASH_COUNT, TRIPLE_FLASH_HALF_PERIOD_MS};
use crate::drivers::hw_init;

/// Drive the pump pin `bit` high or low.
pub fn set(bit: u8, high: bool) {
    hw_init::pin_write(bit, high);
}

/// Pulse `bit` on/off `TRIPLE_FLASH_COUNT` times, `TRIPLE_FLASH_HALF_PERIOD_MS`
/// each half, to signal a skipped watering cycle.
pub fn triple_flash(bit: u8) {
    for _ in 0..TRIPLE_FLASH_COUNT {
        set(bit, true);
        hw_init::delay_ms(TRIPLE_FLASH_HALF_PERIOD_MS);
        set(bit, false);
        hw_init::delay_ms(TRIPLE_FLASH_HALF_PERIOD_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins;

    #[test]
    fn set_round_trips_pin_level() {
        hw_init::sim_reset();
        hw_init::init_peripherals();
        set(pins::PUMP1_BIT, true);
        assert!(hw_init::pin_is_high(pins::PUMP1_BIT));
        set(pins::PUMP1_BIT, false);
        assert!(!hw_init::pin_is_high(pins::PUMP1_BIT));
    }

    #[test]
    fn triple_flash_leaves_pin_low() {
        hw_init::sim_reset();
        hw_init::init_peripherals();
        triple_flash(pins::PUMP2_BIT);
        assert!(!hw_init::pin_is_high(pins::PUMP2_BIT));
    }
}
