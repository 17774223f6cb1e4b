//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the control rules for the heater: command
//! interpretation, the per-cycle orchestration of safety evaluation, the
//! mode FSM and actuation, and status reporting. All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
