//! `critical-section` backend for the real target.
//!
//! The `critical-section` crate needs exactly one global implementation
//! per binary. HAL crates usually supply one; this MCU class has none
//! in the dependency graph, so it is hand-rolled here: save the global
//! interrupt-enable bit, `cli`, and restore it on release. Host builds
//! use the crate's own `std`-backed implementation instead (see
//! `Cargo.toml`).

#[cfg(target_arch = "avr")]
mod avr_impl {
    use critical_section::{Impl, RawRestoreState};

    const SREG: *mut u8 = 0x5f as *mut u8;
    const I_BIT: u8 = 7;

    struct AvrCriticalSection;
    critical_section::set_impl!(AvrCriticalSection);

    unsafe impl Impl for AvrCriticalSection {
        unsafe fn acquire() -> RawRestoreState {
            let sreg = unsafe { core::ptr::read_volatile(SREG) };
            unsafe { core::arch::asm!("cli") };
            sreg & (1 << I_BIT) != 0
        }

        unsafe fn release(was_enabled: RawRestoreState) {
            if was_enabled {
                unsafe { core::arch::asm!("sei") };
            }
        }
    }
}
