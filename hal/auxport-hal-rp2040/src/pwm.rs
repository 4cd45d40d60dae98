//! RP2040 PWM backend
//!
//! Every GPIO is wired to one channel of one PWM slice:
//! slice = (gpio >> 1) & 7, channel A for even and B for odd pins. The
//! two pins of a slice share its divider and TOP, so configuring one of
//! them retimes the other.

use auxport_hal::{PinRole, Polarity, PwmHardware, TimerConfig};
use embassy_rp::pac;

/// Number of PWM slices
pub const SLICE_COUNT: u8 = 8;

/// Largest counter wrap value (TOP is 16 bits)
pub const MAX_TOP: u32 = u16::MAX as u32;

/// GPIO function select for the PWM block
const FUNCSEL_PWM: u8 = 4;
/// GPIO function select for software control (SIO)
const FUNCSEL_SIO: u8 = 5;

/// PWM slice driving a GPIO
pub const fn slice_of(pin: u8) -> u8 {
    (pin >> 1) & (SLICE_COUNT - 1)
}

/// Whether a GPIO is on channel B of its slice
pub const fn is_channel_b(pin: u8) -> bool {
    pin & 1 == 1
}

/// Clamp a counter value to the 16-bit registers
fn to_register(value: u32) -> u16 {
    value.min(MAX_TOP) as u16
}

/// Integer divider, 1-255 (0 would mean 256)
fn to_divider(prescaler: u32) -> u8 {
    prescaler.clamp(1, u8::MAX as u32) as u8
}

/// PWM hardware access through the RP2040 register blocks
///
/// The slices behind the board's aux pins must not be handed to other
/// drivers as well.
pub struct Rp2040Pwm {
    _private: (),
}

impl Rp2040Pwm {
    /// Create the backend; the clocks must already be initialised
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for Rp2040Pwm {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmHardware for Rp2040Pwm {
    fn configure_pin_function(&mut self, pin: u8, role: PinRole) {
        let funcsel = match role {
            PinRole::Pwm => FUNCSEL_PWM,
            PinRole::Gpio => FUNCSEL_SIO,
        };
        pac::IO_BANK0
            .gpio(pin as usize)
            .ctrl()
            .write(|w| w.set_funcsel(funcsel));
    }

    fn set_level(&mut self, pin: u8, level: u32) {
        let level = to_register(level);
        pac::PWM.ch(slice_of(pin) as usize).cc().modify(|w| {
            if is_channel_b(pin) {
                w.set_b(level);
            } else {
                w.set_a(level);
            }
        });
    }

    fn init_timer(&mut self, pin: u8, config: &TimerConfig) {
        let ch = pac::PWM.ch(slice_of(pin) as usize);
        let inverted = config.polarity == Polarity::Inverted;

        ch.csr().modify(|w| w.set_en(false));
        ch.div().write(|w| {
            w.set_int(to_divider(config.prescaler));
            w.set_frac(0);
        });
        ch.top().write(|w| w.set_top(to_register(config.period)));
        ch.ctr().write(|w| w.set_ctr(0));

        self.set_level(pin, config.start_level);

        ch.csr().modify(|w| {
            if is_channel_b(pin) {
                w.set_b_inv(inverted);
            } else {
                w.set_a_inv(inverted);
            }
            w.set_ph_correct(false);
            w.set_en(true);
        });
    }

    fn clock_hz(&self) -> u32 {
        embassy_rp::clocks::clk_sys_freq()
    }

    fn max_period(&self) -> u32 {
        MAX_TOP
    }

    fn shares_timer(&self, pin: u8, other: u8) -> bool {
        slice_of(pin) == slice_of(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_mapping() {
        assert_eq!(slice_of(0), 0);
        assert_eq!(slice_of(21), 2);
        assert_eq!(slice_of(22), 3);
        assert_eq!(slice_of(26), 5);
        assert_eq!(slice_of(27), 5);
        assert_eq!(slice_of(28), 6);
        // GPIO16+ wrap around onto the same slices as GPIO0-15
        assert_eq!(slice_of(16), slice_of(0));
    }

    #[test]
    fn test_channel_mapping() {
        assert!(!is_channel_b(26));
        assert!(is_channel_b(27));
        assert!(is_channel_b(21));
    }

    #[test]
    fn test_register_clamping() {
        assert_eq!(to_register(25_000), 25_000);
        assert_eq!(to_register(2_500_000), u16::MAX);
        assert_eq!(to_divider(0), 1);
        assert_eq!(to_divider(50), 50);
        assert_eq!(to_divider(1000), 255);
    }

    #[test]
    fn test_shared_slices() {
        let pwm = Rp2040Pwm::new();
        assert_eq!(pwm.max_period(), 65_535);
        assert!(pwm.shares_timer(26, 27));
        assert!(!pwm.shares_timer(21, 22));
        assert!(!pwm.shares_timer(27, 28));
    }
}
