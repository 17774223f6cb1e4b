//! Safety supervisor.
//!
//! The supervisor runs **every cycle before the FSM** and judges the
//! cycle's probe readings. Its verdict is written to
//! `ControllerContext.fault`; the FSM state handlers check it to decide
//! whether to latch `FaultStop`.
//!
//! ## Fault lifecycle
//!
//! 1. A probe reads disconnected or outside the legal interval, or no probe
//!    produced a usable value.
//! 2. `evaluate()` returns the first offending condition.
//! 3. The FSM enters `FaultStop`; `fault_stop_enter` zeroes the setpoint and
//!    forces the heater off.
//! 4. Evaluation continues every cycle (the verdict is still reported), but
//!    nothing leaves `FaultStop` until power is cycled. The first fault is
//!    kept as the latched cause.

use crate::config::ControllerConfig;
use crate::error::ProbeFault;
use crate::fsm::context::ProbeReading;
use log::{error, info};

/// Closed interval of physically plausible probe temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureLimits {
    pub min_c: f32,
    pub max_c: f32,
}

impl TemperatureLimits {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            min_c: config.min_legal_temp_c,
            max_c: config.max_legal_temp_c,
        }
    }

    /// True if `celsius` lies outside `[min_c, max_c]`. NaN is not outside.
    pub fn is_outside(&self, celsius: f32) -> bool {
        celsius < self.min_c || celsius > self.max_c
    }
}

/// Validate every probe reading. Returns the first offending probe.
///
/// NaN readings pass here; they are dropped from the control mean and only
/// fault the cycle if nothing usable remains (see [`SafetySupervisor`]).
pub fn validate_readings(
    readings: &[ProbeReading],
    limits: &TemperatureLimits,
) -> Result<(), ProbeFault> {
    for (probe, reading) in readings.iter().enumerate() {
        match *reading {
            ProbeReading::Disconnected => return Err(ProbeFault::Disconnected { probe }),
            ProbeReading::Celsius(celsius) if limits.is_outside(celsius) => {
                return Err(ProbeFault::OutOfRange { probe, celsius });
            }
            ProbeReading::Celsius(_) => {}
        }
    }
    Ok(())
}

/// Safety supervisor.
pub struct SafetySupervisor {
    limits: TemperatureLimits,
    /// Verdict of the most recent cycle.
    current: Option<ProbeFault>,
    /// First fault ever seen this power cycle.
    latched: Option<ProbeFault>,
}

impl SafetySupervisor {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            limits: TemperatureLimits::from_config(config),
            current: None,
            latched: None,
        }
    }

    /// Judge this cycle's readings. Returns `Some(fault)` if unsafe.
    pub fn evaluate(&mut self, readings: &[ProbeReading]) -> Option<ProbeFault> {
        let verdict = validate_readings(readings, &self.limits)
            .and_then(|()| {
                if readings.iter().any(|r| r.is_usable()) {
                    Ok(())
                } else {
                    Err(ProbeFault::NoValidReadings)
                }
            })
            .err();

        match (self.current, verdict) {
            (None, Some(fault)) => error!("SAFETY FAULT SET: {fault}"),
            (Some(_), None) => info!("probe readings back in range (stop remains latched)"),
            _ => {}
        }

        if let Some(fault) = verdict {
            self.latched.get_or_insert(fault);
        }
        self.current = verdict;
        verdict
    }

    /// The first fault seen since boot, if any.
    pub fn latched_fault(&self) -> Option<ProbeFault> {
        self.latched
    }
}
