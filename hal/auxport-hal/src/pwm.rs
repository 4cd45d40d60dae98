//! PWM hardware access
//!
//! The calls here are synchronous register writes. They cannot fail at this
//! level: pin and channel validity is established by the board's pin table
//! before any of them is issued.

/// Function a pin is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Plain software-controlled GPIO
    Gpio,
    /// Output of the timer slice the pin belongs to
    Pwm,
}

/// Output polarity of a timer channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Output is high while the counter is below the level
    #[default]
    Normal,
    /// Output is low while the counter is below the level
    Inverted,
}

/// Timer setup for one PWM output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// Integer clock divider applied to the system clock
    pub prescaler: u32,
    /// Counter wrap value (counts per PWM cycle)
    pub period: u32,
    /// Level loaded before the timer starts
    pub start_level: u32,
    /// Channel output polarity
    pub polarity: Polarity,
}

/// Hardware access for PWM-capable pins
///
/// Implementations map a GPIO number to whatever timer/channel drives it.
pub trait PwmHardware {
    /// Route a pin to the given function
    fn configure_pin_function(&mut self, pin: u8, role: PinRole);

    /// Write a raw compare level for the channel driving `pin`
    ///
    /// Must be safe to call from interrupt context once the channel has
    /// been initialised with [`PwmHardware::init_timer`].
    fn set_level(&mut self, pin: u8, level: u32);

    /// Program and start the timer channel driving `pin`
    fn init_timer(&mut self, pin: u8, config: &TimerConfig);

    /// System clock feeding the PWM timers, in Hz
    fn clock_hz(&self) -> u32;

    /// Largest period the timer counter can hold
    fn max_period(&self) -> u32;

    /// Whether `pin` and `other` are driven by the same timer
    ///
    /// Programming the timer for one of them also retimes the other.
    fn shares_timer(&self, pin: u8, other: u8) -> bool {
        pin == other
    }
}
