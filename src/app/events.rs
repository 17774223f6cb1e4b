//! Outbound application events.
//!
//! The [`ControllerService`](super::service::ControllerService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them (console log, test recorder).

use crate::error::{ParseError, ProbeFault};
use crate::fsm::SafetyMode;

pub use crate::protocol::status::StatusReport;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// The service has started (carries initial mode).
    Started(SafetyMode),

    /// The FSM moved to a more severe mode.
    ModeChanged { from: SafetyMode, to: SafetyMode },

    /// A command changed the setpoint.
    SetpointChanged { from: f32, to: f32 },

    /// An emergency-stop command was received.
    EmergencyStopRequested,

    /// A well-formed command was out of range, or arrived in a stop mode.
    CommandIgnored(f32),

    /// A frame's text was not a number; it was treated as 0.
    MalformedCommand(ParseError),

    /// A frame was longer than the command buffer.
    FrameOverflow,

    /// The heater output was switched.
    HeaterSwitched(bool),

    /// The probe set was judged unsafe this cycle.
    FaultDetected(ProbeFault),

    /// The status line could not be delivered.
    StatusDropped,

    /// The cycle's status report (also written to the serial link).
    Status(StatusReport),
}
