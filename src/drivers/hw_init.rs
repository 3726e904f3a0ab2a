//! Raw register access and one-time peripheral initialisation.
//!
//! On the real target this pokes the reference MCU's I/O registers
//! directly (no AVR HAL crate dependency — the register map for a
//! part this small is stable and small enough to hand-roll, matching
//! the no-dependency style other ATtiny/ATmega firmware in this space
//! uses). On host/simulation builds the same interface is backed by a
//! plain in-memory port so the rest of the crate, including the event
//! loop, compiles and runs identically under test.

use crate::pins;

#[cfg(target_arch = "avr")]
pub mod regs {
    //! Memory-mapped register addresses for the reference MCU
    //! (ATtiny13A-class). I/O addresses per the datasheet, offset by
    //! 0x20 for the data-memory-mapped address `core::ptr` needs.

    pub const PINB: *mut u8 = 0x36 as *mut u8;
    pub const DDRB: *mut u8 = 0x37 as *mut u8;
    pub const PORTB: *mut u8 = 0x38 as *mut u8;

    pub const MCUCR: *mut u8 = 0x55 as *mut u8;
    pub const MCUSR: *mut u8 = 0x54 as *mut u8;
    pub const GIMSK: *mut u8 = 0x5b as *mut u8;
    pub const PCMSK: *mut u8 = 0x35 as *mut u8;
    pub const PCIFR: *mut u8 = 0x5a as *mut u8;

    pub const WDTCR: *mut u8 = 0x41 as *mut u8;

    pub const TCCR0A: *mut u8 = 0x4a as *mut u8;
    pub const TCCR0B: *mut u8 = 0x53 as *mut u8;
    pub const TCNT0: *mut u8 = 0x52 as *mut u8;
    pub const OCR0A: *mut u8 = 0x56 as *mut u8;
    pub const TIMSK0: *mut u8 = 0x59 as *mut u8;
    pub const TIFR0: *mut u8 = 0x58 as *mut u8;

    pub const PUD: u8 = 6;
    pub const SE: u8 = 5;
    pub const SM1: u8 = 4;
    pub const SM0: u8 = 3;

    pub const PCIE: u8 = 5;

    pub const WDTIE: u8 = 6;
    pub const WDTIF: u8 = 7;
    pub const WDCE: u8 = 4;
    pub const WDE: u8 = 3;
    pub const WDP3: u8 = 5;
    pub const WDP2: u8 = 2;
    pub const WDP1: u8 = 1;
    pub const WDP0: u8 = 0;

    pub const OCIE0A: u8 = 4;
    pub const WGM01: u8 = 1;
    pub const CS01: u8 = 1;
    pub const CS00: u8 = 0;

    /// # Safety
    /// `addr` must name a valid I/O register for this MCU.
    #[inline(always)]
    pub unsafe fn read_volatile(addr: *mut u8) -> u8 {
        unsafe { core::ptr::read_volatile(addr) }
    }

    /// # Safety
    /// `addr` must name a valid I/O register for this MCU.
    #[inline(always)]
    pub unsafe fn write_volatile(addr: *mut u8, val: u8) {
        unsafe { core::ptr::write_volatile(addr, val) }
    }
}

#[cfg(not(target_arch = "avr"))]
mod sim {
    //! In-memory stand-in for the PORTB-equivalent register trio, used
    //! by host/simulation builds and the test suite.

    use core::sync::atomic::{AtomicU8, Ordering};

    static DDR: AtomicU8 = AtomicU8::new(0);
    static PORT: AtomicU8 = AtomicU8::new(0);
    /// External/simulated pin levels for input pins (button, overflow
    /// sensors) — tests drive this directly.
    static PIN_EXTERNAL: AtomicU8 = AtomicU8::new(0xff);

    pub fn ddr() -> u8 {
        DDR.load(Ordering::Relaxed)
    }

    pub fn set_ddr(v: u8) {
        DDR.store(v, Ordering::Relaxed);
    }

    pub fn port() -> u8 {
        PORT.load(Ordering::Relaxed)
    }

    pub fn set_port(v: u8) {
        PORT.store(v, Ordering::Relaxed);
    }

    /// Pin register read-back: outputs reflect `PORT`, inputs reflect
    /// the externally driven level.
    pub fn pin() -> u8 {
        let ddr = ddr();
        (PORT.load(Ordering::Relaxed) & ddr) | (PIN_EXTERNAL.load(Ordering::Relaxed) & !ddr)
    }

    /// Test/simulation hook: drive an input pin's external level.
    pub fn set_external_level(bit: u8, high: bool) {
        let mask = 1 << bit;
        if high {
            PIN_EXTERNAL.fetch_or(mask, Ordering::Relaxed);
        } else {
            PIN_EXTERNAL.fetch_and(!mask, Ordering::Relaxed);
        }
    }

    #[cfg(test)]
    pub fn reset() {
        DDR.store(0, Ordering::Relaxed);
        PORT.store(0, Ordering::Relaxed);
        PIN_EXTERNAL.store(0xff, Ordering::Relaxed);
    }
}

#[cfg(not(target_arch = "avr"))]
pub use sim::{reset as sim_reset, set_external_level as sim_set_external_level};

/// Read a single bit of the port's pin register ("is-high").
pub fn pin_is_high(bit: u8) -> bool {
    #[cfg(target_arch = "avr")]
    {
        (unsafe { regs::read_volatile(regs::PINB) } & (1 << bit)) != 0
    }
    #[cfg(not(target_arch = "avr"))]
    {
        (sim::pin() & (1 << bit)) != 0
    }
}

/// Drive a single output bit high or low.
pub fn pin_write(bit: u8, high: bool) {
    #[cfg(target_arch = "avr")]
    unsafe {
        let mut v = regs::read_volatile(regs::PORTB);
        if high {
            v |= 1 << bit;
        } else {
            v &= !(1 << bit);
        }
        regs::write_volatile(regs::PORTB, v);
    }
    #[cfg(not(target_arch = "avr"))]
    {
        let mut v = sim::port();
        if high {
            v |= 1 << bit;
        } else {
            v &= !(1 << bit);
        }
        sim::set_port(v);
    }
}

/// Busy-wait delay in whole milliseconds. Used for the settling pause
/// and the triple-flash, which are too short to justify arming the
/// virtual watchdog.
pub fn delay_ms(ms: u32) {
    #[cfg(target_arch = "avr")]
    {
        for _ in 0..ms {
            for _ in 0..(crate::config::F_CPU_HZ / 1000 / 4) {
                unsafe { core::arch::asm!("nop") };
            }
        }
    }
    #[cfg(not(target_arch = "avr"))]
    {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

/// One-time startup sequence: disable unneeded peripherals, configure
/// the port (pumps low, button/overflow pins input+pull-up), enable
/// the button's pin-change interrupt.
pub fn init_peripherals() {
    #[cfg(target_arch = "avr")]
    unsafe {
        regs::write_volatile(regs::DDRB, pins::OUTPUT_MASK);
        regs::write_volatile(regs::PORTB, pins::INPUT_PULLUP_MASK);
        regs::write_volatile(regs::PCMSK, pins::PCINT_MASK);
        regs::write_volatile(regs::GIMSK, 1 << regs::PCIE);
        regs::write_volatile(regs::PCIFR, 0xff);
        let mcucr = regs::read_volatile(regs::MCUCR);
        // Deepest sleep mode (power-down): SM1=1, SM0=0.
        regs::write_volatile(regs::MCUCR, (mcucr & !((1 << regs::SM1) | (1 << regs::SM0))) | (1 << regs::SM1));
    }
    #[cfg(not(target_arch = "avr"))]
    {
        sim::set_ddr(pins::OUTPUT_MASK);
        sim::set_port(pins::INPUT_PULLUP_MASK);
    }
}

/// Enter the configured sleep mode with the sleep-enable latch set,
/// then clear it on wake. Must be called with interrupts already
/// masked (`disable_interrupts`) and the flag word re-checked empty;
/// `sei` and `sleep` are emitted as one inline-asm block so no
/// instruction can land between them — the architecture guarantees the
/// `sleep` executes before any interrupt pending at the `sei` is
/// serviced, closing the missed-wakeup race. Interrupts are unmasked on
/// return.
pub fn sleep_cpu() {
    #[cfg(target_arch = "avr")]
    unsafe {
        let mcucr = regs::read_volatile(regs::MCUCR);
        regs::write_volatile(regs::MCUCR, mcucr | (1 << regs::SE));
        core::arch::asm!("sei", "sleep");
        let mcucr = regs::read_volatile(regs::MCUCR);
        regs::write_volatile(regs::MCUCR, mcucr & !(1 << regs::SE));
    }
    #[cfg(not(target_arch = "avr"))]
    {
        // Nothing to sleep on in simulation; the test harness drives
        // time and interrupts explicitly.
    }
}

pub fn enable_interrupts() {
    #[cfg(target_arch = "avr")]
    unsafe {
        core::arch::asm!("sei");
    }
}

pub fn disable_interrupts() {
    #[cfg(target_arch = "avr")]
    unsafe {
        core::arch::asm!("cli");
    }
}
