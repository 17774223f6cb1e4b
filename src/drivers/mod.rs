//! Actuator and bus drivers, hardware initialisation, and the watchdog.

pub mod heater;
pub mod hw_init;
pub mod onewire;
pub mod watchdog;
