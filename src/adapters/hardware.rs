//! Hardware adapter. Bridges real peripherals to domain port traits.
//!
//! Owns the probe source and the heater driver, exposing them through
//! [`ProbePort`] and [`HeaterPort`]. On target the probe source is a
//! [`ProbeArray`](crate::sensors::ProbeArray) on the 1-Wire bus; on host it
//! is the simulation store. The heater driver uses cfg-gated GPIO helpers.

use crate::app::ports::{HeaterPort, ProbePort};
use crate::drivers::heater::HeaterDriver;
use crate::fsm::context::ProbeReadings;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P> {
    probes: P,
    heater: HeaterDriver,
}

impl<P: ProbePort> HardwareAdapter<P> {
    pub fn new(probes: P, heater: HeaterDriver) -> Self {
        Self { probes, heater }
    }

    /// Heater level changes since boot.
    pub fn heater_switch_count(&self) -> u32 {
        self.heater.switch_count()
    }

    pub fn probes_mut(&mut self) -> &mut P {
        &mut self.probes
    }
}

// ── ProbePort implementation ──────────────────────────────────

impl<P: ProbePort> ProbePort for HardwareAdapter<P> {
    fn read_all(&mut self) -> ProbeReadings {
        self.probes.read_all()
    }

    fn probe_count(&self) -> usize {
        self.probes.probe_count()
    }
}

// ── HeaterPort implementation ─────────────────────────────────

impl<P> HeaterPort for HardwareAdapter<P> {
    fn set_heater(&mut self, on: bool) {
        self.heater.set(on);
    }

    fn is_heater_on(&self) -> bool {
        self.heater.is_on()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::sensors::sim::SimProbes;

    #[test]
    fn delegates_to_drivers() {
        let mut hw = HardwareAdapter::new(SimProbes::new(2), HeaterDriver::new());
        assert_eq!(hw.probe_count(), 2);
        assert_eq!(hw.read_all().len(), 2);

        hw.set_heater(true);
        assert!(hw.is_heater_on());
        hw.set_heater(false);
        assert_eq!(hw.heater_switch_count(), 2);
    }
}
