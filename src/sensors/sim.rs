//! Host-side probe simulation.
//!
//! Stands in for the 1-Wire bus when running off-target. Readings live in a
//! global store guarded by a critical section, so a test harness or an
//! interrupt-like producer can inject temperatures while the control loop
//! reads them without tearing a multi-probe update.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::app::ports::ProbePort;
use crate::config::MAX_PROBES;
use crate::fsm::context::{ProbeReading, ProbeReadings};

/// Room temperature default so a fresh simulation starts healthy.
pub const SIM_DEFAULT_C: f32 = 21.0;

static SIM_PROBES: Mutex<RefCell<[ProbeReading; MAX_PROBES]>> =
    Mutex::new(RefCell::new([ProbeReading::Celsius(SIM_DEFAULT_C); MAX_PROBES]));

/// Inject one probe's next reading. Out-of-range indices are ignored.
pub fn sim_set_probe(index: usize, reading: ProbeReading) {
    critical_section::with(|cs| {
        if let Some(slot) = SIM_PROBES.borrow_ref_mut(cs).get_mut(index) {
            *slot = reading;
        }
    });
}

/// Inject the same temperature on every probe.
pub fn sim_set_all(celsius: f32) {
    critical_section::with(|cs| {
        SIM_PROBES
            .borrow_ref_mut(cs)
            .iter_mut()
            .for_each(|slot| *slot = ProbeReading::Celsius(celsius));
    });
}

/// Probe port backed by the simulation store.
pub struct SimProbes {
    count: usize,
}

impl SimProbes {
    pub fn new(count: usize) -> Self {
        Self {
            count: count.min(MAX_PROBES),
        }
    }
}

impl ProbePort for SimProbes {
    fn read_all(&mut self) -> ProbeReadings {
        let snapshot = critical_section::with(|cs| *SIM_PROBES.borrow_ref(cs));
        snapshot[..self.count].iter().copied().collect()
    }

    fn probe_count(&self) -> usize {
        self.count
    }
}
