//! Non-volatile `pump_on_seconds` storage.
//!
//! One 16-bit little-endian unsigned integer at a fixed address.
//! Default on an uninitialised device is 5. On the real target this is
//! on-chip EEPROM, pre-loaded with the default at flash time (the
//! `EEMEM` initialiser the original source uses); host/simulation
//! builds back it with a plain static seeded with the same default
//! bytes, rather than a runtime "all-0xFF means never written"
//! sentinel, so a stored `0xFFFF` (a legal value in the 1-65535 range)
//! round-trips correctly instead of being mistaken for "uninitialised".

use crate::config::{DEFAULT_PUMP_ON_SECONDS, NV_PUMP_ON_SECONDS_ADDR};

#[cfg(target_arch = "avr")]
mod target {
    //! EEPROM byte access via the reference MCU's EEPROM controller
    //! registers (EEARL/EEDR/EECR), following the standard
    //! read-then-write-with-poll sequence.

    const EEARL: *mut u8 = 0x3e as *mut u8;
    const EEDR: *mut u8 = 0x3c as *mut u8;
    const EECR: *mut u8 = 0x3d as *mut u8;
    const EERE: u8 = 0;
    const EEWE: u8 = 1;

    pub fn read_byte(addr: u8) -> u8 {
        unsafe {
            while core::ptr::read_volatile(EECR) & (1 << EEWE) != 0 {}
            core::ptr::write_volatile(EEARL, addr);
            core::ptr::write_volatile(EECR, 1 << EERE);
            core::ptr::read_volatile(EEDR)
        }
    }

    pub fn write_byte(addr: u8, val: u8) {
        unsafe {
            while core::ptr::read_volatile(EECR) & (1 << EEWE) != 0 {}
            core::ptr::write_volatile(EEARL, addr);
            core::ptr::write_volatile(EEDR, val);
            core::ptr::write_volatile(EECR, 1 << EEWE);
        }
    }
}

#[cfg(not(target_arch = "avr"))]
mod target {
    use core::sync::atomic::{AtomicU8, Ordering};

    use crate::config::DEFAULT_PUMP_ON_SECONDS;

    const DEFAULT_BYTES: [u8; 2] = DEFAULT_PUMP_ON_SECONDS.to_le_bytes();

    static CELL: [AtomicU8; 2] = [
        AtomicU8::new(DEFAULT_BYTES[0]),
        AtomicU8::new(DEFAULT_BYTES[1]),
    ];

    pub fn read_byte(addr: u8) -> u8 {
        CELL[addr as usize].load(Ordering::Relaxed)
    }

    pub fn write_byte(addr: u8, val: u8) {
        CELL[addr as usize].store(val, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub fn reset_to_default() {
        CELL[0].store(DEFAULT_BYTES[0], Ordering::Relaxed);
        CELL[1].store(DEFAULT_BYTES[1], Ordering::Relaxed);
    }
}

/// Read the persisted pump-on duration, in seconds.
pub fn read_pump_on_seconds() -> u16 {
    let lo = target::read_byte(NV_PUMP_ON_SECONDS_ADDR as u8);
    let hi = target::read_byte(NV_PUMP_ON_SECONDS_ADDR as u8 + 1);
    u16::from_le_bytes([lo, hi])
}

/// Persist a new pump-on duration, in seconds.
pub fn write_pump_on_seconds(seconds: u16) {
    let [lo, hi] = seconds.to_le_bytes();
    target::write_byte(NV_PUMP_ON_SECONDS_ADDR as u8, lo);
    target::write_byte(NV_PUMP_ON_SECONDS_ADDR as u8 + 1, hi);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_device_reads_default() {
        target::reset_to_default();
        assert_eq!(read_pump_on_seconds(), DEFAULT_PUMP_ON_SECONDS);
    }

    #[test]
    fn all_ones_is_a_legal_stored_value_not_a_sentinel() {
        write_pump_on_seconds(0xffff);
        assert_eq!(read_pump_on_seconds(), 0xffff);
    }

    #[test]
    fn write_then_read_round_trips() {
        write_pump_on_seconds(42);
        assert_eq!(read_pump_on_seconds(), 42);
    }

    #[test]
    fn write_then_read_round_trips_max_value() {
        write_pump_on_seconds(65535);
        assert_eq!(read_pump_on_seconds(), 65535);
    }
}
