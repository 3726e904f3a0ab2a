//! Fatal-halt primitive.
//!
//! Invoked on unrecoverable invariant violation. Drives all outputs
//! low, disables pull-ups, masks interrupts, enters permanent deep
//! sleep, and never returns.

use crate::error::HaltReason;

#[cfg(target_arch = "avr")]
mod target {
    use crate::drivers::hw_init::regs;

    pub fn halt() -> ! {
        unsafe {
            regs::write_volatile(regs::PORTB, 0x00);
            // PUD (Pull-up Disable) lives in MCUCR on the reference part.
            let mcucr = regs::read_volatile(regs::MCUCR);
            regs::write_volatile(regs::MCUCR, mcucr | (1 << regs::PUD));
            core::arch::asm!("cli");
            loop {
                core::arch::asm!("sleep");
            }
        }
    }
}

#[cfg(not(target_arch = "avr"))]
mod target {
    pub fn halt() -> ! {
        panic!("fatal halt");
    }
}

/// Invoke the fatal-halt primitive. Never returns.
pub fn halt(reason: HaltReason) -> ! {
    log::error!("fatal halt: {reason}");
    target::halt();
}
