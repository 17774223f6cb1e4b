//! EzBake heater controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod protocol;
pub mod safety;

// Hardware-facing modules. On host the drivers fall back to in-memory
// simulation, so everything here also builds and tests off-target.
pub mod adapters;
pub mod drivers;
pub mod sensors;
