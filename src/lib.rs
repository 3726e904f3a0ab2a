//! Automatic plant-watering controller firmware core.
//!
//! Exposes the pure-logic modules for host-side testing. The
//! target-only pieces (raw register access, the timed hardware-
//! watchdog write sequence, ISR vectors) are guarded by
//! `cfg(target_arch = "avr")` within each module, so the crate
//! compiles and its test suite runs on the host exactly as it behaves
//! on the reference MCU.

#![cfg_attr(target_arch = "avr", no_std)]
#![deny(unused_must_use)]

pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;
pub mod halt;
pub mod nvstore;
pub mod pins;
pub mod run;
pub mod sensors;
