//! Pin capability table types
//!
//! Boards describe their analog-capable aux pins as static [`PinDef`]
//! tables, one per direction. The tables are read once by
//! [`PortRegistry::new`](crate::registry::PortRegistry::new).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Port type, the first dispatch criterion of every port operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PortType {
    /// On/off ports, owned by the digital subsystem
    Digital,
    /// Analog (PWM or static) ports, owned by this crate
    Analog,
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PortDirection {
    Input,
    Output,
}

/// Capability and state flags of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinMode {
    /// Pin drives a signal
    pub output: bool,
    /// Pin carries an analog value
    pub analog: bool,
    /// Pin is backed by a PWM timer channel
    pub pwm: bool,
    /// Pin has been claimed by a feature
    pub claimed: bool,
}

impl PinMode {
    /// Analog input
    pub const fn analog_input() -> Self {
        Self {
            output: false,
            analog: true,
            pwm: false,
            claimed: false,
        }
    }

    /// Analog output without a timer behind it
    pub const fn analog_output() -> Self {
        Self {
            output: true,
            analog: true,
            pwm: false,
            claimed: false,
        }
    }

    /// PWM-capable analog output
    pub const fn pwm_output() -> Self {
        Self {
            output: true,
            analog: true,
            pwm: true,
            claimed: false,
        }
    }
}

/// Semantic role of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinFunction {
    /// Numbered analog aux input
    AuxInputAnalog(u8),
    /// Numbered analog aux output
    AuxOutputAnalog(u8),
    /// Spindle speed PWM
    SpindlePwm,
}

/// Group a pin is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinGroup {
    AuxInputAnalog,
    AuxOutputAnalog,
    SpindlePwm,
}

/// One entry of a board's pin capability table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinDef {
    /// GPIO number
    pub pin: u8,
    /// Capability flags (`claimed` is ignored)
    pub mode: PinMode,
    pub function: PinFunction,
    pub group: PinGroup,
}

impl PinDef {
    /// Numbered analog aux input
    pub const fn aux_input(pin: u8, aux: u8) -> Self {
        Self {
            pin,
            mode: PinMode::analog_input(),
            function: PinFunction::AuxInputAnalog(aux),
            group: PinGroup::AuxInputAnalog,
        }
    }

    /// Numbered analog aux output, PWM-capable or not
    pub const fn aux_output(pin: u8, aux: u8, pwm: bool) -> Self {
        Self {
            pin,
            mode: if pwm {
                PinMode::pwm_output()
            } else {
                PinMode::analog_output()
            },
            function: PinFunction::AuxOutputAnalog(aux),
            group: PinGroup::AuxOutputAnalog,
        }
    }
}
