//! GPIO pin assignments for the reference board.
//!
//! Single source of truth — every driver references this module rather
//! than hard-coding pin numbers. Change a pin here and it propagates
//! everywhere. These are parameters of the target board, not of the
//! control logic above them.
//!
//! All pins live on port B of the reference MCU.

/// Momentary push-button, active-low with internal pull-up. Also the
/// pin-change interrupt source.
pub const BUTTON_BIT: u8 = 0;
/// Overflow sensor 1, active-low with internal pull-up ("low" = full).
pub const OVERFLOW1_BIT: u8 = 1;
/// Overflow sensor 2, active-low with internal pull-up ("low" = full).
pub const OVERFLOW2_BIT: u8 = 2;
/// Pump 1 drive output.
pub const PUMP1_BIT: u8 = 3;
/// Pump 2 drive output.
pub const PUMP2_BIT: u8 = 4;

/// Mask of pins configured as outputs at startup (the pump pins).
pub const OUTPUT_MASK: u8 = (1 << PUMP1_BIT) | (1 << PUMP2_BIT);

/// Mask of pins configured as inputs with pull-ups (button + overflow
/// sensors).
pub const INPUT_PULLUP_MASK: u8 = (1 << BUTTON_BIT) | (1 << OVERFLOW1_BIT) | (1 << OVERFLOW2_BIT);

/// Mask of pins that should post the pin-change interrupt.
pub const PCINT_MASK: u8 = 1 << BUTTON_BIT;
