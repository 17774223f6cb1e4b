//! Mock hardware adapter for integration tests.
//!
//! Records every heater write so tests can assert on the full actuation
//! history without touching a real GPIO line. Probe readings are scripted
//! per cycle; once the script runs out the last set repeats.

use std::collections::VecDeque;

use ezbake::app::events::ControllerEvent;
use ezbake::app::ports::{EventSink, HeaterPort, ProbePort};
use ezbake::fsm::context::{ProbeReading, ProbeReadings};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    script: VecDeque<ProbeReadings>,
    current: ProbeReadings,
    heater: bool,
    /// Every level written to the heater, in order.
    pub heater_writes: Vec<bool>,
}

#[allow(dead_code)]
impl MockHardware {
    /// All probes report `values` every cycle.
    pub fn steady(values: &[f32]) -> Self {
        Self {
            script: VecDeque::new(),
            current: celsius(values),
            heater: false,
            heater_writes: Vec::new(),
        }
    }

    /// Replace the readings returned from the next cycle on.
    pub fn set_readings(&mut self, readings: &[ProbeReading]) {
        self.script.clear();
        self.current = readings.iter().copied().collect();
    }

    /// Queue one cycle's readings after whatever is already scripted.
    pub fn push_cycle(&mut self, readings: &[ProbeReading]) {
        self.script.push_back(readings.iter().copied().collect());
    }

    pub fn heater(&self) -> bool {
        self.heater
    }

    /// Number of physical on/off transitions after the initial write.
    pub fn toggles(&self) -> usize {
        self.heater_writes.windows(2).filter(|w| w[0] != w[1]).count()
    }
}

impl ProbePort for MockHardware {
    fn read_all(&mut self) -> ProbeReadings {
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        self.current.clone()
    }

    fn probe_count(&self) -> usize {
        self.current.len()
    }
}

impl HeaterPort for MockHardware {
    fn set_heater(&mut self, on: bool) {
        self.heater = on;
        self.heater_writes.push(on);
    }

    fn is_heater_on(&self) -> bool {
        self.heater
    }
}

pub fn celsius(values: &[f32]) -> ProbeReadings {
    values.iter().map(|&v| ProbeReading::Celsius(v)).collect()
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps everything it is given.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ControllerEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&ControllerEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControllerEvent) {
        self.events.push(event.clone());
    }
}
