//! Shared mutable context threaded through every FSM handler.
//!
//! `ControllerContext` is the single struct that state handlers read from
//! and write to: the cycle's probe readings, the setpoint, the heater
//! intent/command/actual triple, the debounce filter and the inputs the
//! service collected this cycle (estop request, safety verdict).

use crate::config::{ControllerConfig, MAX_PROBES};
use crate::control::debounce::Debouncer;
use crate::error::ProbeFault;

/// Value the Dallas acquisition libraries return for an absent probe.
pub const DISCONNECTED_SENTINEL_C: f32 = -127.0;

// ---------------------------------------------------------------------------
// Probe readings (written by the probe port; read-only to state handlers)
// ---------------------------------------------------------------------------

/// One probe's result for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeReading {
    /// A converted temperature. May be NaN if the conversion produced no
    /// number; NaN values are excluded from the control mean.
    Celsius(f32),
    /// The probe did not answer or its data failed the integrity check.
    Disconnected,
}

impl ProbeReading {
    /// Map a raw library value, where the disconnected sentinel is in-band.
    #[allow(clippy::float_cmp)] // sentinel is an exact bit pattern
    pub fn from_raw(celsius: f32) -> Self {
        if celsius == DISCONNECTED_SENTINEL_C {
            Self::Disconnected
        } else {
            Self::Celsius(celsius)
        }
    }

    /// The converted value, if any.
    pub fn celsius(self) -> Option<f32> {
        match self {
            Self::Celsius(c) => Some(c),
            Self::Disconnected => None,
        }
    }

    /// True if this reading can contribute to the control mean.
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Celsius(c) if !c.is_nan())
    }
}

/// All probe readings for one cycle, in probe-index order.
pub type ProbeReadings = heapless::Vec<ProbeReading, MAX_PROBES>;

// ---------------------------------------------------------------------------
// ControllerContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct ControllerContext {
    // -- Inputs collected by the service before the FSM tick --
    /// Latest probe readings.
    pub readings: ProbeReadings,
    /// Safety verdict for `readings` (`None` = safe).
    pub fault: Option<ProbeFault>,
    /// An emergency-stop command arrived this cycle.
    pub estop_requested: bool,

    // -- Control state --
    /// Target temperature (°C).
    pub setpoint_c: f32,
    /// Bang-bang decision before debounce.
    pub heater_intent: bool,
    /// Command for this cycle after debounce / stop override.
    pub heater_command: bool,
    /// Last level physically written to the heater output.
    pub heater_actual: bool,
    /// Cycle-count dwell filter between heater transitions.
    pub debounce: Debouncer,

    // -- Configuration --
    pub config: ControllerConfig,
}

impl ControllerContext {
    /// Create a new context with startup defaults: setpoint 0, heater off,
    /// debounce counter primed so the first transition is allowed.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            readings: ProbeReadings::new(),
            fault: None,
            estop_requested: false,
            setpoint_c: 0.0,
            heater_intent: false,
            heater_command: false,
            heater_actual: false,
            debounce: Debouncer::new(config.debounce_cycles),
            config,
        }
    }

    /// Force the heater command off for this cycle.
    pub fn command_off(&mut self) {
        self.heater_intent = false;
        self.heater_command = false;
    }
}
