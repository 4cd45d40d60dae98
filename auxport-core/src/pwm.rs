//! PWM value codec
//!
//! Converts a value in the configured input range (e.g. 0-100 for a
//! percentage, or an RPM range for a spindle) into a raw timer compare
//! level. All the division happens once in [`PwmParams::precompute`];
//! [`PwmParams::encode`] is a multiply-add so it can run on the output
//! path without cost concerns.
//!
//! # Prescaler tiers
//!
//! The timer counter is fed by the system clock through an integer
//! prescaler chosen from the target frequency:
//!
//! | frequency      | prescaler |
//! |----------------|-----------|
//! | > 2000 Hz      | 1         |
//! | > 200 Hz       | 12        |
//! | otherwise      | 50        |
//!
//! Lower frequencies trade resolution for a period that still fits the
//! counter. Below the last tier's reach (about 38 Hz from a 125 MHz clock
//! into a 16-bit counter) the frequency is rejected.

use auxport_hal::{PinRole, Polarity, PwmHardware, TimerConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors from PWM parameter computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Frequency is zero, negative or not a number, or its period does
    /// not fit the timer counter
    InvalidFrequency,
    /// Input range is empty (`max <= min`)
    InvalidRange,
}

/// PWM channel configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PwmConfig {
    /// Target PWM frequency in Hz
    pub freq_hz: f32,
    /// Lowest input value
    pub min: f32,
    /// Highest input value
    pub max: f32,
    /// Duty cycle percentage while off
    pub off_value: f32,
    /// Duty cycle percentage at `min`
    pub min_value: f32,
    /// Duty cycle percentage at `max`
    pub max_value: f32,
    /// Reverse the level mapping (active-low outputs)
    pub invert: bool,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            freq_hz: 5000.0,
            min: 0.0,
            max: 100.0,
            off_value: 0.0,
            min_value: 0.0,
            max_value: 100.0,
            invert: false,
        }
    }
}

/// Select the clock prescaler for a target frequency
pub fn prescaler_for(freq_hz: f32) -> u32 {
    if freq_hz > 2000.0 {
        1
    } else if freq_hz > 200.0 {
        12
    } else {
        50
    }
}

/// Precomputed PWM parameters for one channel
///
/// The public levels are the values the hardware sees, inversion already
/// applied.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmParams {
    /// Clock prescaler the period was computed for
    pub prescaler: u32,
    /// Counter period in prescaled clock ticks
    pub period: u32,
    /// Level while off
    pub off_level: u32,
    /// Level at the bottom of the input range
    pub min_level: u32,
    /// Level at the top of the input range
    pub max_level: u32,
    config: PwmConfig,
    // Non-inverted levels and slope, so encoding stays monotonic
    // regardless of inversion.
    raw_min: u32,
    raw_max: u32,
    gradient: f32,
}

impl PwmParams {
    /// Compute channel parameters for `config` against the system clock
    ///
    /// `max_period` is the largest value the timer counter can hold; a
    /// frequency whose period is zero or exceeds it is rejected.
    pub fn precompute(
        config: &PwmConfig,
        clock_hz: u32,
        max_period: u32,
    ) -> Result<Self, PwmError> {
        if config.freq_hz.is_nan() || config.freq_hz <= 0.0 {
            return Err(PwmError::InvalidFrequency);
        }
        if config.min.is_nan() || config.max.is_nan() || config.max <= config.min {
            return Err(PwmError::InvalidRange);
        }

        let prescaler = prescaler_for(config.freq_hz);
        let period = ((clock_hz / prescaler) as f32 / config.freq_hz) as u32;
        if period == 0 || period > max_period {
            return Err(PwmError::InvalidFrequency);
        }

        let raw_min = duty_level(period, config.min_value);
        let raw_max = duty_level(period, config.max_value);
        let raw_off = duty_level(period, config.off_value);
        let gradient = (raw_max as f32 - raw_min as f32) / (config.max - config.min);

        let invert = |level: u32| {
            if config.invert {
                period.saturating_sub(level)
            } else {
                level
            }
        };

        Ok(Self {
            prescaler,
            period,
            off_level: invert(raw_off),
            min_level: invert(raw_min),
            max_level: invert(raw_max),
            config: *config,
            raw_min,
            raw_max,
            gradient,
        })
    }

    /// Convert an input value to a counter level
    ///
    /// `value` must lie within `[min, max]`; this is not checked. Values
    /// outside the range produce levels outside `[min_level, max_level]`,
    /// saturated at the counter's numeric limits.
    pub fn encode(&self, value: f32) -> u32 {
        let raw = if value == self.config.max {
            self.raw_max
        } else if value == self.config.min {
            self.raw_min
        } else {
            // Float to int casts saturate, so this cannot wrap
            (self.raw_min as f32 + (value - self.config.min) * self.gradient) as u32
        };

        if self.config.invert {
            self.period.saturating_sub(raw)
        } else {
            raw
        }
    }

    /// Whether the level mapping is reversed
    pub fn is_inverted(&self) -> bool {
        self.config.invert
    }

    /// Input range the parameters were computed for
    pub fn range(&self) -> (f32, f32) {
        (self.config.min, self.config.max)
    }

    /// Configuration the parameters were computed from
    pub fn config(&self) -> &PwmConfig {
        &self.config
    }

    /// Timer setup for these parameters, starting at the off level
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            prescaler: self.prescaler,
            period: self.period,
            start_level: self.off_level,
            // Inversion is already folded into the levels
            polarity: Polarity::Normal,
        }
    }
}

fn duty_level(period: u32, percent: f32) -> u32 {
    (period as f32 * percent / 100.0) as u32
}

/// Route `pin` to its timer and start it at the off level
///
/// Must complete before the first [`PwmParams::encode`] based write to the pin.
pub fn program<H: PwmHardware>(hw: &mut H, pin: u8, params: &PwmParams) {
    hw.configure_pin_function(pin, PinRole::Pwm);
    hw.set_level(pin, params.off_level);
    hw.init_timer(pin, &params.timer_config());

    debug!(
        "PWM on GPIO{}: prescaler {} period {}",
        pin,
        params.prescaler,
        params.period
    );
}
