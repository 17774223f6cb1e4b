//! Heater element driver (solid-state relay on one digital output).
//!
//! ## Safety contract
//!
//! The heater must be off in every stop mode. Enforced by the FSM and the
//! service; this driver is a dumb actuator.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct HeaterDriver {
    pin: i32,
    on: bool,
    switch_count: u32,
}

impl Default for HeaterDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaterDriver {
    /// Driver on [`pins::OUTPUT_PIN`]. The pin must already be configured
    /// and driven low by `hw_init`.
    pub fn new() -> Self {
        Self::on_pin(pins::OUTPUT_PIN)
    }

    pub fn on_pin(pin: i32) -> Self {
        Self {
            pin,
            on: false,
            switch_count: 0,
        }
    }

    /// Drive the output. Always writes the pin; counts level changes.
    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.pin, on);
        if on != self.on {
            self.switch_count = self.switch_count.saturating_add(1);
        }
        self.on = on;
    }

    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Level changes since boot (relay wear indicator).
    pub fn switch_count(&self) -> u32 {
        self.switch_count
    }
}
