//! Pump implicit-state decode and per-step transitions.
//!
//! Grounded in `original_source/event_handler/watchdog.c`'s
//! `handle_event_watchdog()` (single-pump variant: "pump on → this
//! wakeup turns it off; pump off → this wakeup starts the routine,
//! unless the overflow sensor says skip"), generalised to drive two
//! pumps in sequence.

use crate::config::{LONG_INTERVAL_SECONDS, PUMP_SETTLE_DELAY_MS};
use crate::drivers::{hw_init, pump, watchdog};
use crate::error::HaltReason;
use crate::events::EventFlags;
use crate::halt;
use crate::nvstore;
use crate::pins;
use crate::sensors::overflow;

/// One step of the two-pump routine. No RAM state is kept between
/// activations — [`decode_current`] recovers this purely from the
/// pump pin levels, so a reset mid-cycle resumes coherently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStep {
    Pump1On,
    Pump1Off,
    Pump2On,
    Pump2Off,
}

/// The step order a single activation walks through via fall-through.
pub const STEP_ORDER: [PumpStep; 4] = [
    PumpStep::Pump1On,
    PumpStep::Pump1Off,
    PumpStep::Pump2On,
    PumpStep::Pump2Off,
];

/// Pure decode of the two pump-pin levels into the next step to run.
/// `None` is the invalid "both pumps simultaneously on" combination.
pub fn decode(pump1_high: bool, pump2_high: bool) -> Option<PumpStep> {
    match (pump1_high, pump2_high) {
        (false, false) => Some(PumpStep::Pump1On),
        (true, false) => Some(PumpStep::Pump1Off),
        (false, true) => Some(PumpStep::Pump2On),
        (true, true) => None,
    }
}

/// Read the actual pump pin levels and decode, invoking fatal halt on
/// the invalid "both pumps on" combination.
pub fn decode_current() -> PumpStep {
    let p1 = hw_init::pin_is_high(pins::PUMP1_BIT);
    let p2 = hw_init::pin_is_high(pins::PUMP2_BIT);
    decode(p1, p2).unwrap_or_else(|| halt::halt(HaltReason::BothPumpsOn))
}

/// Run one step. Returns `true` if the step armed the virtual watchdog
/// and the routine should return now; `false` to fall through to the
/// next step in [`STEP_ORDER`].
pub fn run_step(step: PumpStep, flags: &EventFlags) -> bool {
    match step {
        PumpStep::Pump1On => {
            if !overflow::is_ok(pins::OVERFLOW1_BIT) {
                pump::triple_flash(pins::PUMP1_BIT);
                false
            } else {
                pump::set(pins::PUMP1_BIT, true);
                watchdog::arm(u32::from(nvstore::read_pump_on_seconds()), flags);
                true
            }
        }
        PumpStep::Pump1Off => {
            pump::set(pins::PUMP1_BIT, false);
            hw_init::delay_ms(PUMP_SETTLE_DELAY_MS);
            false
        }
        PumpStep::Pump2On => {
            if !overflow::is_ok(pins::OVERFLOW2_BIT) {
                pump::triple_flash(pins::PUMP2_BIT);
                false
            } else {
                pump::set(pins::PUMP2_BIT, true);
                watchdog::arm(u32::from(nvstore::read_pump_on_seconds()), flags);
                true
            }
        }
        PumpStep::Pump2Off => {
            pump::set(pins::PUMP2_BIT, false);
            watchdog::arm(LONG_INTERVAL_SECONDS, flags);
            true
        }
    }
}
