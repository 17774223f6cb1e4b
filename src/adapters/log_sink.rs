//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured controller events to the
//! `log` facade (the ESP-IDF console on target). The console is separate
//! from the protocol UART, so nothing here can corrupt the status stream.

use log::{debug, error, info, warn};

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControllerEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Started(mode) => {
                info!("START | mode={:?}", mode);
            }
            ControllerEvent::ModeChanged { from, to } => {
                warn!("MODE  | {:?} -> {:?}", from, to);
            }
            ControllerEvent::SetpointChanged { from, to } => {
                info!("SETPT | {:.2} -> {:.2}\u{00b0}C", from, to);
            }
            ControllerEvent::EmergencyStopRequested => {
                warn!("ESTOP | operator stop requested");
            }
            ControllerEvent::CommandIgnored(v) => {
                warn!("CMD   | ignored value {}", v);
            }
            ControllerEvent::MalformedCommand(e) => {
                warn!("CMD   | malformed ({}), treated as 0", e);
            }
            ControllerEvent::FrameOverflow => {
                warn!("CMD   | frame overflow");
            }
            ControllerEvent::HeaterSwitched(on) => {
                info!("HEAT  | {}", if *on { "ON" } else { "OFF" });
            }
            ControllerEvent::FaultDetected(fault) => {
                error!("FAULT | code={} {}", fault.code(), fault);
            }
            ControllerEvent::StatusDropped => {
                warn!("STAT  | status line dropped");
            }
            ControllerEvent::Status(s) => {
                debug!(
                    "STAT  | mode={:?} heater={} setpoint={:.2} probes={}",
                    s.mode,
                    u8::from(s.heater_on),
                    s.setpoint_c,
                    s.readings.len(),
                );
            }
        }
    }
}
