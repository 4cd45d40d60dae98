//! Port handler interface
//!
//! Every port subsystem (digital, analog) implements [`PortHandler`]. The
//! analog subsystem wraps the digital one and forwards whatever it does not
//! own, so firmware talks to a single handler regardless of port type.

use crate::pins::{PinFunction, PinGroup, PinMode, PortDirection, PortType};
use crate::pwm::{PwmConfig, PwmError, PwmParams};
use crate::registry::Description;

/// Errors from port operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// Port number beyond the ports of that type and direction
    OutOfRange,
    /// Port is already claimed
    AlreadyClaimed,
    /// Operation not available for this port type/direction
    Unsupported,
    /// No such port, or it lacks the requested capability
    NotFound,
    /// PWM configuration rejected
    InvalidConfig(PwmError),
}

impl From<PwmError> for PortError {
    fn from(err: PwmError) -> Self {
        PortError::InvalidConfig(err)
    }
}

/// What drives a port
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortKind {
    /// On/off pin owned by the digital subsystem
    Digital,
    /// Timer-backed analog output with its current PWM parameters
    ///
    /// Reprogram it with [`PortHandler::configure_pwm`].
    AnalogPwm(PwmParams),
    /// Analog port without a timer
    AnalogStatic,
}

/// Snapshot of a port's description
#[derive(Debug, Clone, PartialEq)]
pub struct PinInfo {
    pub kind: PortKind,
    /// GPIO number
    pub pin: u8,
    pub mode: PinMode,
    pub function: PinFunction,
    pub group: PinGroup,
    pub description: Description,
}

impl PinInfo {
    /// Single-bit mask of the GPIO in its port register
    pub fn bit(&self) -> u32 {
        1u32.checked_shl(self.pin as u32).unwrap_or(0)
    }
}

/// Port handler
///
/// Failures are reported to the caller only; handlers never retry, log or
/// panic on bad input.
pub trait PortHandler {
    /// Describe a port
    fn pin_info(
        &self,
        port_type: PortType,
        direction: PortDirection,
        port: u8,
    ) -> Result<PinInfo, PortError>;

    /// Set a port's description; ignored for ports the handler doesn't know
    fn set_pin_description(
        &mut self,
        port_type: PortType,
        direction: PortDirection,
        port: u8,
        description: &str,
    );

    /// Claim a port for exclusive use by a feature
    ///
    /// On success `port` is updated to the number the claimed port is
    /// addressed by from now on.
    ///
    /// For analog outputs `port` goes in as a physical index (board table
    /// order), unlike the other methods here which take logical slots. Once
    /// anything has been claimed the two differ: resolve a slot with
    /// [`PortRegistry::map_output`](crate::registry::PortRegistry::map_output)
    /// before claiming it.
    fn claim(
        &mut self,
        port_type: PortType,
        direction: PortDirection,
        port: &mut u8,
        description: &str,
    ) -> Result<(), PortError>;

    /// Drive an analog output
    ///
    /// `value` is not validated: it must be within the range the port's PWM
    /// channel was configured for.
    fn analog_write(&mut self, port: u8, value: f32) -> Result<(), PortError> {
        let _ = (port, value);
        Err(PortError::Unsupported)
    }

    /// Reprogram the PWM channel behind an analog output
    ///
    /// Outputs sharing the channel's timer follow the new frequency and
    /// are reset to their off level.
    fn configure_pwm(&mut self, port: u8, config: &PwmConfig) -> Result<PwmParams, PortError> {
        let _ = (port, config);
        Err(PortError::NotFound)
    }

    /// Number of analog inputs
    fn analog_inputs(&self) -> u8 {
        0
    }

    /// Number of unclaimed analog outputs
    fn analog_outputs(&self) -> u8 {
        0
    }
}

/// An absent handler owns no ports
impl<T: PortHandler> PortHandler for Option<T> {
    fn pin_info(
        &self,
        port_type: PortType,
        direction: PortDirection,
        port: u8,
    ) -> Result<PinInfo, PortError> {
        match self {
            Some(handler) => handler.pin_info(port_type, direction, port),
            None => Err(PortError::NotFound),
        }
    }

    fn set_pin_description(
        &mut self,
        port_type: PortType,
        direction: PortDirection,
        port: u8,
        description: &str,
    ) {
        if let Some(handler) = self {
            handler.set_pin_description(port_type, direction, port, description);
        }
    }

    fn claim(
        &mut self,
        port_type: PortType,
        direction: PortDirection,
        port: &mut u8,
        description: &str,
    ) -> Result<(), PortError> {
        match self {
            Some(handler) => handler.claim(port_type, direction, port, description),
            None => Err(PortError::Unsupported),
        }
    }

    fn analog_write(&mut self, port: u8, value: f32) -> Result<(), PortError> {
        match self {
            Some(handler) => handler.analog_write(port, value),
            None => Err(PortError::Unsupported),
        }
    }

    fn configure_pwm(&mut self, port: u8, config: &PwmConfig) -> Result<PwmParams, PortError> {
        match self {
            Some(handler) => handler.configure_pwm(port, config),
            None => Err(PortError::NotFound),
        }
    }

    fn analog_inputs(&self) -> u8 {
        self.as_ref().map_or(0, |handler| handler.analog_inputs())
    }

    fn analog_outputs(&self) -> u8 {
        self.as_ref().map_or(0, |handler| handler.analog_outputs())
    }
}
