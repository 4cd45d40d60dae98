//! Board aux pin tables
//!
//! # Generic 4-axis map
//!
//! | port      | GPIO | slice |
//! |-----------|------|-------|
//! | Aux out 0 | 21   | 2B    |
//! | Aux out 1 | 22   | 3A    |
//! | Aux out 2 | 26   | 5A    |
//! | Aux out 3 | 27   | 5B    |
//! | Aux out 4 | 28   | 6A    |
//!
//! Aux outputs 2 and 3 share slice 5 and therefore one PWM frequency.
//! Reconfiguring either one moves the other to the new frequency and
//! resets it to its off level.
//! The aux inputs of this board (GPIO16-20) have no ADC channel, so it
//! has no analog inputs.

use auxport_core::{install, IoPorts, PinDef, PortHandler};

use crate::pwm::Rp2040Pwm;

/// Analog aux outputs of the generic 4-axis board
pub static GENERIC_4AXIS_AUX_OUTPUTS: [PinDef; 5] = [
    PinDef::aux_output(21, 0, true),
    PinDef::aux_output(22, 1, true),
    PinDef::aux_output(26, 2, true),
    PinDef::aux_output(27, 3, true),
    PinDef::aux_output(28, 4, true),
];

/// Analog aux inputs of the generic 4-axis board
pub static GENERIC_4AXIS_AUX_INPUTS: [PinDef; 0] = [];

/// Chain the generic 4-axis board's analog ports in front of `digital`
pub fn install_generic_4axis<D: PortHandler>(digital: D) -> IoPorts<Rp2040Pwm, D> {
    install(
        digital,
        &GENERIC_4AXIS_AUX_INPUTS,
        &GENERIC_4AXIS_AUX_OUTPUTS,
        Rp2040Pwm::new(),
    )
}
