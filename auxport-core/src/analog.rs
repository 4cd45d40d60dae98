//! Analog port handler
//!
//! [`AnalogPorts`] owns the registry and the PWM hardware and sits in front
//! of the digital handler it was built with:
//!
//! ```text
//! request ──► AnalogPorts ──(PortType::Digital)──► digital handler
//!                 │
//!                 └─(PortType::Analog)──► PortRegistry / PWM hardware
//! ```
//!
//! [`install`] builds the chain at startup. Boards without analog pins get
//! the digital handler back untouched.

use auxport_hal::PwmHardware;

use crate::handler::{PinInfo, PortError, PortHandler, PortKind};
use crate::pins::{PinDef, PortDirection, PortType};
use crate::pwm::{self, PwmConfig, PwmParams};
use crate::registry::PortRegistry;

/// Analog port handler chained in front of a digital one
pub struct AnalogPorts<H, D> {
    registry: PortRegistry,
    hw: H,
    digital: D,
}

impl<H: PwmHardware, D: PortHandler> AnalogPorts<H, D> {
    /// Take over `registry` and program the default PWM configuration on
    /// every PWM-capable output
    pub fn new(registry: PortRegistry, hw: H, digital: D) -> Self {
        let mut ports = Self {
            registry,
            hw,
            digital,
        };

        let config = PwmConfig::default();
        for physical in 0..ports.registry.outputs() {
            let is_pwm = ports
                .registry
                .output(physical)
                .is_some_and(|descriptor| descriptor.mode.pwm);

            if is_pwm {
                if let Err(err) = ports.program_pwm(physical, &config) {
                    warn!("Aux out {}: no default PWM: {:?}", physical, err);
                }
            }
        }

        info!(
            "Analog ports: {} in, {} out",
            ports.registry.inputs(),
            ports.registry.outputs()
        );

        ports
    }

    /// Port registry
    pub fn registry(&self) -> &PortRegistry {
        &self.registry
    }

    /// PWM hardware
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// The handler digital requests are forwarded to
    pub fn digital(&self) -> &D {
        &self.digital
    }

    fn program_pwm(&mut self, physical: u8, config: &PwmConfig) -> Result<PwmParams, PortError> {
        let pin = self
            .registry
            .output(physical)
            .ok_or(PortError::OutOfRange)?
            .pin;
        let params = PwmParams::precompute(config, self.hw.clock_hz(), self.hw.max_period())?;

        self.registry.bind_pwm(physical, params)?;
        pwm::program(&mut self.hw, pin, &params);

        Ok(params)
    }

    /// Rebind PWM outputs sharing a timer with `physical` to its new
    /// frequency
    ///
    /// Their duty mapping is kept and their compare level is reset to the
    /// new off level.
    fn retime_siblings(&mut self, physical: u8, freq_hz: f32) {
        let Some(pin) = self.registry.output(physical).map(|d| d.pin) else {
            return;
        };
        let clock_hz = self.hw.clock_hz();
        let max_period = self.hw.max_period();

        for other in 0..self.registry.outputs() {
            if other == physical {
                continue;
            }
            let Some(other_pin) = self.registry.output(other).map(|d| d.pin) else {
                continue;
            };
            if !self.hw.shares_timer(pin, other_pin) {
                continue;
            }
            let Some(current) = self.registry.pwm(other) else {
                continue;
            };

            let config = PwmConfig {
                freq_hz,
                ..*current.config()
            };
            let Ok(params) = PwmParams::precompute(&config, clock_hz, max_period) else {
                continue;
            };
            if self.registry.bind_pwm(other, params).is_ok() {
                self.hw.set_level(other_pin, params.off_level);
                debug!("Aux out {} retimed with GPIO{}", other, pin);
            }
        }
    }

    fn output_info(&self, slot: u8) -> Option<PinInfo> {
        let physical = self.registry.map_slot(slot)?;
        let descriptor = self.registry.output(physical)?;

        let kind = match self.registry.pwm(physical) {
            Some(params) => PortKind::AnalogPwm(*params),
            None => PortKind::AnalogStatic,
        };

        Some(PinInfo {
            kind,
            pin: descriptor.pin,
            mode: descriptor.mode,
            function: descriptor.function,
            group: descriptor.group,
            description: descriptor.description.clone(),
        })
    }
}

impl<H: PwmHardware, D: PortHandler> PortHandler for AnalogPorts<H, D> {
    fn pin_info(
        &self,
        port_type: PortType,
        direction: PortDirection,
        port: u8,
    ) -> Result<PinInfo, PortError> {
        match (port_type, direction) {
            (PortType::Digital, _) => self.digital.pin_info(port_type, direction, port),
            (PortType::Analog, PortDirection::Output) => {
                self.output_info(port).ok_or(PortError::NotFound)
            }
            (PortType::Analog, PortDirection::Input) => Err(PortError::NotFound),
        }
    }

    fn set_pin_description(
        &mut self,
        port_type: PortType,
        direction: PortDirection,
        port: u8,
        description: &str,
    ) {
        match (port_type, direction) {
            (PortType::Digital, _) => {
                self.digital
                    .set_pin_description(port_type, direction, port, description);
            }
            (PortType::Analog, PortDirection::Output) => {
                let _ = self.registry.set_description(port, description);
            }
            (PortType::Analog, PortDirection::Input) => {}
        }
    }

    fn claim(
        &mut self,
        port_type: PortType,
        direction: PortDirection,
        port: &mut u8,
        description: &str,
    ) -> Result<(), PortError> {
        match (port_type, direction) {
            (PortType::Digital, _) => self.digital.claim(port_type, direction, port, description),
            (PortType::Analog, PortDirection::Output) => {
                let physical = *port;
                self.registry.claim(port, description)?;

                debug!(
                    "Aux out {} claimed as '{}', now slot {}",
                    physical,
                    description,
                    *port
                );
                Ok(())
            }
            (PortType::Analog, PortDirection::Input) => Err(PortError::Unsupported),
        }
    }

    fn analog_write(&mut self, port: u8, value: f32) -> Result<(), PortError> {
        let physical = self.registry.map_slot(port).ok_or(PortError::OutOfRange)?;
        let pin = self
            .registry
            .output(physical)
            .ok_or(PortError::OutOfRange)?
            .pin;
        let params = self.registry.pwm(physical).ok_or(PortError::Unsupported)?;

        self.hw.set_level(pin, params.encode(value));
        Ok(())
    }

    fn configure_pwm(&mut self, port: u8, config: &PwmConfig) -> Result<PwmParams, PortError> {
        let physical = self.registry.map_slot(port).ok_or(PortError::NotFound)?;
        if self.registry.pwm(physical).is_none() {
            return Err(PortError::NotFound);
        }

        let params = self.program_pwm(physical, config)?;
        self.retime_siblings(physical, config.freq_hz);
        debug!("Aux out {} reconfigured at {} Hz", port, config.freq_hz);

        Ok(params)
    }

    fn analog_inputs(&self) -> u8 {
        self.registry.inputs()
    }

    fn analog_outputs(&self) -> u8 {
        self.registry.available_outputs()
    }
}

/// The active port handler set
pub enum IoPorts<H, D> {
    /// No analog pins: digital handler only
    Digital(D),
    /// Analog handler chained in front of the digital one
    Analog(AnalogPorts<H, D>),
}

impl<H, D> IoPorts<H, D> {
    /// Whether the analog handler is installed
    pub fn has_analog(&self) -> bool {
        matches!(self, IoPorts::Analog(_))
    }
}

/// Build the port handler chain from the board's analog pin tables
///
/// With no analog pins at all, `digital` is returned as the whole handler
/// set and `hw` is dropped without being touched.
pub fn install<H: PwmHardware, D: PortHandler>(
    digital: D,
    inputs: &[PinDef],
    outputs: &[PinDef],
    hw: H,
) -> IoPorts<H, D> {
    match PortRegistry::new(inputs, outputs) {
        Some(registry) => IoPorts::Analog(AnalogPorts::new(registry, hw, digital)),
        None => {
            debug!("No analog ports");
            IoPorts::Digital(digital)
        }
    }
}

impl<H: PwmHardware, D: PortHandler> PortHandler for IoPorts<H, D> {
    fn pin_info(
        &self,
        port_type: PortType,
        direction: PortDirection,
        port: u8,
    ) -> Result<PinInfo, PortError> {
        match self {
            IoPorts::Digital(digital) => digital.pin_info(port_type, direction, port),
            IoPorts::Analog(analog) => analog.pin_info(port_type, direction, port),
        }
    }

    fn set_pin_description(
        &mut self,
        port_type: PortType,
        direction: PortDirection,
        port: u8,
        description: &str,
    ) {
        match self {
            IoPorts::Digital(digital) => {
                digital.set_pin_description(port_type, direction, port, description)
            }
            IoPorts::Analog(analog) => {
                analog.set_pin_description(port_type, direction, port, description)
            }
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
            IoPorts::Digital(digital) => digital.claim(port_type, direction, port, description),
            IoPorts::Analog(analog) => analog.claim(port_type, direction, port, description),
        }
    }

    fn analog_write(&mut self, port: u8, value: f32) -> Result<(), PortError> {
        match self {
            IoPorts::Digital(digital) => digital.analog_write(port, value),
            IoPorts::Analog(analog) => analog.analog_write(port, value),
        }
    }

    fn configure_pwm(&mut self, port: u8, config: &PwmConfig) -> Result<PwmParams, PortError> {
        match self {
            IoPorts::Digital(digital) => digital.configure_pwm(port, config),
            IoPorts::Analog(analog) => analog.configure_pwm(port, config),
        }
    }

    fn analog_inputs(&self) -> u8 {
        match self {
            IoPorts::Digital(digital) => digital.analog_inputs(),
            IoPorts::Analog(analog) => analog.analog_inputs(),
        }
    }

    fn analog_outputs(&self) -> u8 {
        match self {
            IoPorts::Digital(digital) => digital.analog_outputs(),
            IoPorts::Analog(analog) => analog.analog_outputs(),
        }
    }
}
