//! Named constants for every magic number the controller depends on.
//!
//! Single source of truth — every module references this rather than
//! re-deriving a timing constant locally.

/// Clock frequency the timed sequences below assume (8 MHz reference MCU).
pub const F_CPU_HZ: u32 = 8_000_000;

/// Hardware watchdog intervals supported by the reference peripheral,
/// largest first. `VirtualWatchdog::configure_sleep` greedily selects
/// from this list.
pub const WDT_INTERVALS_SECONDS: [u8; 4] = [8, 4, 2, 1];

/// Nominal interval between watering cycles.
pub const LONG_INTERVAL_SECONDS: u32 = 24 * 60 * 60;

/// Default `pump_on_seconds` value on an uninitialised device.
pub const DEFAULT_PUMP_ON_SECONDS: u16 = 5;

/// Valid range for a persisted pump-on duration.
pub const PUMP_ON_SECONDS_MIN: u16 = 1;
pub const PUMP_ON_SECONDS_MAX: u16 = 65535;

/// Consecutive same-level samples the debounce shift register requires
/// before committing to a logical edge.
pub const DEBOUNCE_SAMPLE_BITS: u32 = 8;

/// Hold duration, in milliseconds, at or above which a press is
/// classified "configure new duration" rather than "run test cycle".
pub const BUTTON_CLASSIFY_THRESHOLD_MS: u32 = 1000;

/// Settling pause between driving pump 1 off and pump 2 on.
pub const PUMP_SETTLE_DELAY_MS: u32 = 200;

/// Half-period of the triple-flash "reservoir full" indication.
pub const TRIPLE_FLASH_HALF_PERIOD_MS: u32 = 100;

/// Number of on/off pulses in the triple-flash indication.
pub const TRIPLE_FLASH_COUNT: u32 = 3;

/// Compare value for `OCR0A` giving a 1 ms tick at `F_CPU_HZ` with a
/// `/64` prescaler: `8_000_000 / 64 / 1000 = 125`.
pub const MILLIS_TIMER_COMPARE: u8 = 125;

/// Byte address of the persisted `pump_on_seconds` value in non-volatile
/// storage (little-endian u16).
pub const NV_PUMP_ON_SECONDS_ADDR: u16 = 0;
