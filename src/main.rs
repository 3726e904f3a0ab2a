//! Entry point and ISR vectors for the plant-watering controller.
//!
//! Wires the two interrupt sources — button pin-change and the
//! hardware watchdog — into the event-flag set, then hands off to
//! [`plant_friend::run::run`]. Grounded in `original_source/main.c`
//! (`ISR(PCINT0_vect)`, `ISR(WDT_vect)`, peripheral disable + pin setup
//! + initial watchdog arm). The dispatch/sleep-arm logic itself lives
//! in the lib crate's `run` module, not here, so it is reachable from
//! `tests/`.

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

use plant_friend::config::LONG_INTERVAL_SECONDS;
use plant_friend::drivers::{hw_init, millis, watchdog};
use plant_friend::error::HaltReason;
use plant_friend::events::{EventFlags, BUTTON};
use plant_friend::halt;
use plant_friend::run;

static FLAGS: EventFlags = EventFlags::new();

// ATtiny13A-class vector table (per the reference part's datasheet):
// 3 = PCINT0, 7 = TIM0_COMPA, 9 = WDT. Vector numbers are a property of
// the target chip, not of the control logic above it.

/// Pin-change interrupt: the button pin changed level. Posts BUTTON;
/// the debounce loop in the button handler does the rest.
#[cfg(target_arch = "avr")]
#[no_mangle]
pub extern "avr-interrupt" fn __vector_3() {
    FLAGS.set(BUTTON);
}

/// Timer0 compare-match: the 1 ms tick.
#[cfg(target_arch = "avr")]
#[no_mangle]
pub extern "avr-interrupt" fn __vector_7() {
    millis::on_compare_match();
}

/// Hardware watchdog interrupt: delegates to the virtual watchdog's
/// tick.
#[cfg(target_arch = "avr")]
#[no_mangle]
pub extern "avr-interrupt" fn __vector_9() {
    watchdog::tick(&FLAGS);
}

/// Any panic is an unmodelled invariant violation; fail safe the same
/// way a modelled one does rather than leave the panic path unhandled.
#[cfg(target_arch = "avr")]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    hw_init::disable_interrupts();
    halt::halt(HaltReason::Panic)
}

/// Startup: disable unneeded peripherals, configure the port (pumps
/// low, button/overflow pins input+pull-up), enable the button's
/// pin-change interrupt, and arm the initial long interval.
fn startup() {
    hw_init::init_peripherals();
    watchdog::arm(LONG_INTERVAL_SECONDS, &FLAGS);
}

fn real_main() -> ! {
    startup();
    run::run(&FLAGS)
}

#[cfg(target_arch = "avr")]
#[no_mangle]
pub extern "C" fn main() -> ! {
    real_main()
}

#[cfg(not(target_arch = "avr"))]
fn main() {
    real_main();
}
