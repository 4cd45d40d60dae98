//! Analog port registry
//!
//! Physical ports are fixed slots in a descriptor arena, one per table
//! entry. Callers address outputs through logical slots instead, resolved
//! by the output map:
//!
//! ```text
//!  slot:      0    1    2    3    4
//!  out_map: [ 0,   2,   4 |  3,   1 ]
//!            \_available_/ \claimed/
//! ```
//!
//! The first `available_outputs()` slots hold the unclaimed ports in their
//! original order. Claiming closes the gap left by the claimed port and
//! parks it directly after the available range, where it stays addressable
//! through the slot number handed back to the claimer.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::handler::PortError;
use crate::pins::{PinDef, PinFunction, PinGroup, PinMode, PortDirection};
use crate::pwm::PwmParams;
use crate::{MAX_ANALOG_PORTS, MAX_DESCRIPTION_LEN};

/// Human-readable port description
pub type Description = String<MAX_DESCRIPTION_LEN>;

/// Copy `text` into a description, truncating at capacity
pub fn describe(text: &str) -> Description {
    let mut description = Description::new();
    for c in text.chars() {
        if description.push(c).is_err() {
            break;
        }
    }
    description
}

/// Canonical name of an unclaimed port: "Aux in N" / "Aux out N"
pub fn port_name(direction: PortDirection, port: u8) -> Description {
    let prefix = match direction {
        PortDirection::Input => "Aux in",
        PortDirection::Output => "Aux out",
    };
    let mut name = Description::new();
    // At most "Aux out 255", well within capacity
    let _ = write!(name, "{} {}", prefix, port);
    name
}

/// Physical analog port
#[derive(Debug, Clone, PartialEq)]
pub struct PortDescriptor {
    /// GPIO number
    pub pin: u8,
    pub mode: PinMode,
    pub function: PinFunction,
    pub group: PinGroup,
    pub description: Description,
    /// Index into the PWM parameter table, PWM-capable outputs only
    pub pwm_idx: Option<u8>,
}

impl PortDescriptor {
    fn from_def(def: &PinDef, direction: PortDirection, port: u8) -> Self {
        let mut mode = def.mode;
        mode.claimed = false;
        mode.analog = true;
        mode.output = direction == PortDirection::Output;

        Self {
            pin: def.pin,
            mode,
            function: def.function,
            group: def.group,
            description: port_name(direction, port),
            pwm_idx: None,
        }
    }
}

/// Registry of analog ports for both directions
#[derive(Debug)]
pub struct PortRegistry {
    inputs: Vec<PortDescriptor, MAX_ANALOG_PORTS>,
    outputs: Vec<PortDescriptor, MAX_ANALOG_PORTS>,
    /// Logical slot -> physical output
    out_map: Vec<u8, MAX_ANALOG_PORTS>,
    n_out_available: u8,
    pwm: Vec<PwmParams, MAX_ANALOG_PORTS>,
}

impl PortRegistry {
    /// Build the registry from a board's pin tables
    ///
    /// Returns `None` when both tables are empty. Entries beyond
    /// [`MAX_ANALOG_PORTS`] per direction are dropped.
    pub fn new(inputs: &[PinDef], outputs: &[PinDef]) -> Option<Self> {
        if inputs.is_empty() && outputs.is_empty() {
            return None;
        }

        let inputs = build_ports(inputs, PortDirection::Input);
        let outputs = build_ports(outputs, PortDirection::Output);
        let out_map = (0..outputs.len() as u8).collect();

        Some(Self {
            n_out_available: outputs.len() as u8,
            inputs,
            outputs,
            out_map,
            pwm: Vec::new(),
        })
    }

    /// Number of analog inputs
    pub fn inputs(&self) -> u8 {
        self.inputs.len() as u8
    }

    /// Number of analog outputs, claimed ones included
    pub fn outputs(&self) -> u8 {
        self.outputs.len() as u8
    }

    /// Number of unclaimed analog outputs
    pub fn available_outputs(&self) -> u8 {
        self.n_out_available
    }

    /// Input descriptor by port number
    pub fn input(&self, port: u8) -> Option<&PortDescriptor> {
        self.inputs.get(port as usize)
    }

    /// Output descriptor by physical index
    pub fn output(&self, physical: u8) -> Option<&PortDescriptor> {
        self.outputs.get(physical as usize)
    }

    /// Resolve an input port number
    ///
    /// Inputs are never claimed, so their numbering is the table order.
    pub fn map_input(&self, port: u8) -> Option<u8> {
        (port < self.inputs()).then_some(port)
    }

    /// Resolve an available logical output to its physical index
    pub fn map_output(&self, port: u8) -> Option<u8> {
        if port < self.n_out_available {
            self.out_map.get(port as usize).copied()
        } else {
            None
        }
    }

    /// Resolve any output slot, claimed ones included
    pub fn map_slot(&self, slot: u8) -> Option<u8> {
        self.out_map.get(slot as usize).copied()
    }

    /// Find the slot currently backed by a physical output
    pub fn reverse_map_output(&self, physical: u8) -> Option<u8> {
        self.out_map
            .iter()
            .rposition(|&p| p == physical)
            .map(|slot| slot as u8)
    }

    /// Claim a physical output for exclusive use
    ///
    /// On success `port` is rewritten to the slot the claimed output now
    /// occupies, just past the available range. Following outputs move down
    /// one slot and are renamed after their new slot. On failure nothing
    /// changes.
    pub fn claim(&mut self, port: &mut u8, description: &str) -> Result<(), PortError> {
        let physical = *port;
        let descriptor = self
            .outputs
            .get(physical as usize)
            .ok_or(PortError::OutOfRange)?;

        if descriptor.mode.claimed {
            return Err(PortError::AlreadyClaimed);
        }

        let slot = match self.reverse_map_output(physical) {
            Some(slot) if slot < self.n_out_available => slot,
            _ => return Err(PortError::AlreadyClaimed),
        };

        let end = self.n_out_available as usize;
        self.n_out_available -= 1;
        self.out_map[slot as usize..end].rotate_left(1);

        for shifted in slot..self.n_out_available {
            let idx = self.out_map[shifted as usize] as usize;
            self.outputs[idx].description = port_name(PortDirection::Output, shifted);
        }

        let descriptor = &mut self.outputs[physical as usize];
        descriptor.mode.claimed = true;
        descriptor.description = describe(description);

        *port = self.n_out_available;
        Ok(())
    }

    /// Replace the description of the output in `slot`
    pub fn set_description(&mut self, slot: u8, description: &str) -> Result<(), PortError> {
        let physical = self.map_slot(slot).ok_or(PortError::OutOfRange)?;
        self.outputs[physical as usize].description = describe(description);
        Ok(())
    }

    /// Attach PWM parameters to a PWM-capable output
    ///
    /// The first call for an output allocates its parameter slot; later
    /// calls replace the parameters in place.
    pub fn bind_pwm(&mut self, physical: u8, params: PwmParams) -> Result<u8, PortError> {
        let descriptor = self
            .outputs
            .get_mut(physical as usize)
            .ok_or(PortError::OutOfRange)?;

        if !descriptor.mode.pwm {
            return Err(PortError::Unsupported);
        }

        match descriptor.pwm_idx {
            Some(idx) => {
                self.pwm[idx as usize] = params;
                Ok(idx)
            }
            None => {
                let idx = self.pwm.len() as u8;
                self.pwm.push(params).map_err(|_| PortError::OutOfRange)?;
                descriptor.pwm_idx = Some(idx);
                Ok(idx)
            }
        }
    }

    /// PWM parameters of a physical output, once bound
    pub fn pwm(&self, physical: u8) -> Option<&PwmParams> {
        let idx = self.output(physical)?.pwm_idx?;
        self.pwm.get(idx as usize)
    }
}

fn build_ports(
    defs: &[PinDef],
    direction: PortDirection,
) -> Vec<PortDescriptor, MAX_ANALOG_PORTS> {
    if defs.len() > MAX_ANALOG_PORTS {
        warn!(
            "{} analog pins listed, only the first {} are used",
            defs.len(),
            MAX_ANALOG_PORTS
        );
    }

    defs.iter()
        .take(MAX_ANALOG_PORTS)
        .enumerate()
        .map(|(port, def)| PortDescriptor::from_def(def, direction, port as u8))
        .collect()
}
