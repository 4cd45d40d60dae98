//! Board-agnostic analog aux port handling
//!
//! This crate turns a board's table of analog-capable pins into dense
//! logical ports that firmware plugins can claim, describe and drive:
//!
//! - Pin capability table types ([`pins`])
//! - PWM value precomputation, encoding and programming ([`pwm`])
//! - Logical/physical port mapping with claim reindexing ([`registry`])
//! - The port handler interface shared with the digital subsystem ([`handler`])
//! - The analog handler chained in front of the digital one ([`analog`], [`install`])
//!
//! # Example
//!
//! ```ignore
//! let mut ports = auxport_core::install(digital, &AUX_INPUTS, &AUX_OUTPUTS, pwm_hw);
//!
//! let mut port = 0;
//! ports.claim(PortType::Analog, PortDirection::Output, &mut port, "Spindle PWM")?;
//! ports.analog_write(port, 42.0)?;
//! ```

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod analog;
pub mod handler;
pub mod pins;
pub mod pwm;
pub mod registry;

#[cfg(test)]
mod mock;

pub use analog::{install, AnalogPorts, IoPorts};
pub use handler::{PinInfo, PortError, PortHandler, PortKind};
pub use pins::{PinDef, PinFunction, PinGroup, PinMode, PortDirection, PortType};
pub use pwm::{PwmConfig, PwmError, PwmParams};
pub use registry::{Description, PortDescriptor, PortRegistry};

/// Maximum analog ports per direction
pub const MAX_ANALOG_PORTS: usize = 16;

/// Maximum length of a port description
pub const MAX_DESCRIPTION_LEN: usize = 32;
