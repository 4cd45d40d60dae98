//! RP2040-specific HAL for auxport
//!
//! This crate provides the RP2040 implementation of the shared
//! `auxport-hal` traits, plus board data:
//!
//! - PWM slice programming keyed by GPIO number ([`pwm::Rp2040Pwm`])
//! - Aux pin tables for supported boards ([`board`])

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod pwm;

pub use pwm::Rp2040Pwm;

// Re-export shared traits from auxport-hal for convenience
pub use auxport_hal::{PinRole, PwmHardware, TimerConfig};
