//! Recording PWM hardware for unit tests

use auxport_hal::{PinRole, PwmHardware, TimerConfig};
use heapless::Vec;

/// One hardware access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Function(u8, PinRole),
    Level(u8, u32),
    Timer(u8, TimerConfig),
}

/// Mock PWM hardware that records every call
pub struct MockPwm {
    pub calls: Vec<HwCall, 64>,
    clock_hz: u32,
    max_period: u32,
    paired: bool,
}

impl MockPwm {
    pub fn new(clock_hz: u32) -> Self {
        Self {
            calls: Vec::new(),
            clock_hz,
            max_period: u16::MAX as u32,
            paired: false,
        }
    }

    /// Drive pins in pairs (2n, 2n+1) from one timer
    pub fn paired(mut self) -> Self {
        self.paired = true;
        self
    }

    /// Level writes only, in order
    pub fn levels(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.calls.iter().filter_map(|call| match *call {
            HwCall::Level(pin, level) => Some((pin, level)),
            _ => None,
        })
    }

    /// Timer setups only, in order
    pub fn timers(&self) -> impl Iterator<Item = (u8, TimerConfig)> + '_ {
        self.calls.iter().filter_map(|call| match *call {
            HwCall::Timer(pin, config) => Some((pin, config)),
            _ => None,
        })
    }
}

impl PwmHardware for MockPwm {
    fn configure_pin_function(&mut self, pin: u8, role: PinRole) {
        let _ = self.calls.push(HwCall::Function(pin, role));
    }

    fn set_level(&mut self, pin: u8, level: u32) {
        let _ = self.calls.push(HwCall::Level(pin, level));
    }

    fn init_timer(&mut self, pin: u8, config: &TimerConfig) {
        let _ = self.calls.push(HwCall::Timer(pin, *config));
    }

    fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn max_period(&self) -> u32 {
        self.max_period
    }

    fn shares_timer(&self, pin: u8, other: u8) -> bool {
        if self.paired {
            pin >> 1 == other >> 1
        } else {
            pin == other
        }
    }
}
