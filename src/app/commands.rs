//! Inbound commands decoded from the serial protocol.
//!
//! A frame carries a single number; its value range decides what it means.
//! The [`ControllerService`](super::service::ControllerService) classifies
//! each frame and acts on it.

use crate::config::ControllerConfig;

/// What a received command value asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `0 ≤ v < max_legal_temp_c`: new target temperature.
    SetSetpoint(f32),

    /// `v ≥ estop_threshold`: latch an operator stop.
    EmergencyStop,

    /// Anything else (negative, NaN, or the gap between the legal maximum
    /// and the estop threshold). Logged and dropped.
    Ignored(f32),
}

impl Command {
    /// Map a frame value onto a command.
    pub fn classify(value: f32, config: &ControllerConfig) -> Self {
        if value >= config.estop_threshold {
            Self::EmergencyStop
        } else if (0.0..config.max_legal_temp_c).contains(&value) {
            Self::SetSetpoint(value)
        } else {
            Self::Ignored(value)
        }
    }
}
