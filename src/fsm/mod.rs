//! Pump finite-state machine.
//!
//! No RAM state is kept between activations: each call to
//! [`run_watering`] decodes the next step from the pump pin levels,
//! then walks [`states::STEP_ORDER`] starting there, falling through
//! until a step arms the virtual watchdog and returns. Entered either
//! from a WDT wake or, for a short button press, as a single test
//! cycle.

pub mod states;

use crate::events::EventFlags;
pub use states::PumpStep;

/// Perform exactly one forward step of the watering routine (possibly
/// several fall-through sub-steps) and return.
pub fn run_watering(flags: &EventFlags) {
    let current = states::decode_current();
    let start = states::STEP_ORDER
        .iter()
        .position(|step| *step == current)
        .expect("decode_current only returns a step present in STEP_ORDER");

    for step in &states::STEP_ORDER[start..] {
        if states::run_step(*step, flags) {
            return;
        }
    }
}
