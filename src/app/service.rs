//! Application service, the hexagonal core.
//!
//! [`ControllerService`] owns the FSM, safety supervisor, command decoder
//! and shared context. One call to [`ControllerService::tick`] is one
//! control cycle. All I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SerialLink ──▶ ┌──────────────────────────────┐ ──▶ SerialLink (status)
//!   ProbePort ──▶ │       ControllerService      │ ──▶ EventSink
//!  HeaterPort ◀── │ Decoder · Safety · FSM · DB  │
//!                 └──────────────────────────────┘
//! ```
//!
//! Cycle order: command ingestion → probe read and safety evaluation →
//! FSM (control decision) → actuation → status report.

use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::ProbeFault;
use crate::fsm::context::ControllerContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, SafetyMode};
use crate::protocol::codec::{CommandFrame, FrameDecoder};
use crate::safety::SafetySupervisor;

use super::commands::Command;
use super::events::{ControllerEvent, StatusReport};
use super::ports::{EventSink, HeaterPort, ProbePort, SerialLink};

// ───────────────────────────────────────────────────────────────
// ControllerService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct ControllerService {
    fsm: Fsm,
    ctx: ControllerContext,
    safety: SafetySupervisor,
    decoder: FrameDecoder,
    last_status: Option<StatusReport>,
    cycle_count: u64,
}

impl ControllerService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig) -> Self {
        let safety = SafetySupervisor::new(&config);
        let ctx = ControllerContext::new(config);
        let fsm = Fsm::new(build_state_table(), SafetyMode::Normal);

        Self {
            fsm,
            ctx,
            safety,
            decoder: FrameDecoder::new(),
            last_status: None,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Write the initial heater level and start the FSM in `Normal`.
    pub fn start(&mut self, heater: &mut impl HeaterPort, sink: &mut impl EventSink) {
        heater.set_heater(self.ctx.heater_actual);
        self.fsm.start(&mut self.ctx);
        sink.emit(&ControllerEvent::Started(self.fsm.current_state()));
        info!(
            "ControllerService started in {:?}, cycle {} ms",
            self.fsm.current_state(),
            self.ctx.config.cycle_interval_ms
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`ProbePort`] and
    /// [`HeaterPort`]. This avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl ProbePort + HeaterPort),
        link: &mut impl SerialLink,
        sink: &mut impl EventSink,
    ) {
        self.cycle_count += 1;
        let prev_mode = self.fsm.current_state();
        self.ctx.estop_requested = false;

        // 1. Command ingestion (at most one frame per cycle)
        if let Some(frame) = self.decoder.poll(link) {
            self.ingest(frame, prev_mode, sink);
        }

        // 2. Probe acquisition + safety evaluation
        self.ctx.readings = hw.read_all();
        self.ctx.fault = self.safety.evaluate(&self.ctx.readings);
        if let Some(fault) = self.ctx.fault {
            if prev_mode != SafetyMode::FaultStop {
                sink.emit(&ControllerEvent::FaultDetected(fault));
            }
        }

        // 3. FSM tick (mode transitions + heater command)
        self.fsm.tick(&mut self.ctx);

        // 4. Actuation, write only on change
        self.apply_heater(hw, sink);

        let mode = self.fsm.current_state();
        if mode != prev_mode {
            sink.emit(&ControllerEvent::ModeChanged {
                from: prev_mode,
                to: mode,
            });
        }

        // 5. Reporting, every cycle in every mode
        self.report(link, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current safety mode.
    pub fn mode(&self) -> SafetyMode {
        self.fsm.current_state()
    }

    /// Current setpoint (°C).
    pub fn setpoint(&self) -> f32 {
        self.ctx.setpoint_c
    }

    /// Level last written to the heater output.
    pub fn heater_on(&self) -> bool {
        self.ctx.heater_actual
    }

    /// The most recent status report, if a cycle has run.
    pub fn last_status(&self) -> Option<&StatusReport> {
        self.last_status.as_ref()
    }

    /// Total control cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// First safety fault seen since boot.
    pub fn last_fault(&self) -> Option<ProbeFault> {
        self.safety.latched_fault()
    }

    /// Debounce counter after the last cycle.
    pub fn debounce_counter(&self) -> u8 {
        self.ctx.debounce.counter()
    }

    /// Live configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn ingest(&mut self, frame: CommandFrame, mode: SafetyMode, sink: &mut impl EventSink) {
        if frame.overflowed {
            warn!("command frame overflowed, excess text dropped");
            sink.emit(&ControllerEvent::FrameOverflow);
        }

        let value = match frame.value {
            Ok(v) => v,
            Err(e) => {
                warn!("malformed command ({e}), treating as 0");
                sink.emit(&ControllerEvent::MalformedCommand(e));
                0.0
            }
        };

        match Command::classify(value, &self.ctx.config) {
            Command::EmergencyStop => {
                warn!("emergency stop requested (value {value:.2})");
                self.ctx.estop_requested = true;
                sink.emit(&ControllerEvent::EmergencyStopRequested);
            }
            Command::SetSetpoint(to) if mode == SafetyMode::Normal => {
                let from = self.ctx.setpoint_c;
                self.ctx.setpoint_c = to;
                info!("setpoint {from:.2} -> {to:.2}\u{00b0}C");
                sink.emit(&ControllerEvent::SetpointChanged { from, to });
            }
            Command::SetSetpoint(v) => {
                warn!("setpoint {v:.2} ignored in {mode:?}");
                sink.emit(&ControllerEvent::CommandIgnored(v));
            }
            Command::Ignored(v) => {
                warn!("command value {v} out of range, ignored");
                sink.emit(&ControllerEvent::CommandIgnored(v));
            }
        }
    }

    fn apply_heater(&mut self, heater: &mut impl HeaterPort, sink: &mut impl EventSink) {
        let command = self.ctx.heater_command;
        if command == self.ctx.heater_actual {
            return;
        }
        heater.set_heater(command);
        self.ctx.heater_actual = command;
        self.ctx.debounce.reset();
        info!("heater {}", if command { "ON" } else { "OFF" });
        sink.emit(&ControllerEvent::HeaterSwitched(command));
    }

    fn report(&mut self, link: &mut impl SerialLink, sink: &mut impl EventSink) {
        let report = StatusReport {
            readings: self.ctx.readings.clone(),
            heater_on: self.ctx.heater_actual,
            setpoint_c: self.ctx.setpoint_c,
            mode: self.fsm.current_state(),
        };

        let sent = report
            .render()
            .and_then(|line| {
                debug!("status: {}", line.trim_end());
                link.write_all(line.as_bytes())
            });
        if let Err(e) = sent {
            warn!("status line dropped: {e}");
            sink.emit(&ControllerEvent::StatusDropped);
        }

        sink.emit(&ControllerEvent::Status(report.clone()));
        self.last_status = Some(report);
    }
}
