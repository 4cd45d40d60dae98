//! auxport Hardware Abstraction Layer
//!
//! This crate defines the hardware access traits the analog port subsystem
//! needs from a chip: routing a pin to its PWM function, programming the
//! timer behind it and writing raw counter levels. Chip-specific crates
//! (RP2040, ...) implement them; `auxport-core` only ever talks to these
//! traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Firmware core / plugins                │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  auxport-core (registry, PWM codec)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  auxport-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ auxport-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`pwm::PwmHardware`] - PWM pin routing, timer setup and level writes

#![no_std]
#![deny(unsafe_code)]

pub mod pwm;

// Re-export key types at crate root for convenience
pub use pwm::{PinRole, Polarity, PwmHardware, TimerConfig};
