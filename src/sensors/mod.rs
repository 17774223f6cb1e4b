//! Probe subsystem: the DS18B20 driver and the aggregating [`ProbeArray`].
//!
//! The array owns the 1-Wire bus and produces one [`ProbeReading`] per
//! configured probe each cycle. Conversions are pipelined: each cycle reads
//! the conversion started on the previous cycle and immediately starts the
//! next one, so the control loop never waits out the conversion time. The
//! cycle period must therefore be at least one conversion long.

pub mod ds18b20;
#[cfg(not(target_os = "espidf"))]
pub mod sim;

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::app::ports::ProbePort;
use crate::config::MAX_PROBES;
use crate::drivers::onewire::{OneWireBus, RomCode, search_roms};
use crate::fsm::context::{ProbeReading, ProbeReadings};
use ds18b20::Resolution;

/// All probes on one 1-Wire bus, indexed in discovery order.
pub struct ProbeArray<B> {
    bus: B,
    roms: heapless::Vec<RomCode, MAX_PROBES>,
    expected: usize,
    resolution: Resolution,
    /// A conversion was started and not yet read.
    conversion_pending: bool,
}

impl<B: OneWireBus> ProbeArray<B> {
    /// Enumerate DS18B20 probes on `bus`.
    ///
    /// Never fails: a discovery error or a short count is logged, and the
    /// missing indices read as [`ProbeReading::Disconnected`] (which the
    /// safety supervisor turns into a fault on the first cycle).
    pub fn discover(mut bus: B, expected: usize) -> Self {
        let expected = expected.min(MAX_PROBES);
        let roms: heapless::Vec<RomCode, MAX_PROBES> = match search_roms::<_, MAX_PROBES>(&mut bus) {
            Ok(found) => found.into_iter().filter(ds18b20::is_ds18b20).collect(),
            Err(e) => {
                error!("probe discovery failed: {e}");
                heapless::Vec::new()
            }
        };

        for (i, rom) in roms.iter().enumerate() {
            info!("probe {i}: ROM {:02X?}", rom);
        }
        if roms.len() < expected {
            warn!("found {} of {} probes", roms.len(), expected);
        } else if roms.len() > expected {
            warn!("found {} probes, using the first {}", roms.len(), expected);
        }

        Self {
            bus,
            roms,
            expected,
            resolution: Resolution::Bits12,
            conversion_pending: false,
        }
    }

    /// Write `resolution` to every discovered probe. Returns how many
    /// accepted it.
    pub fn configure(&mut self, resolution: Resolution) -> usize {
        self.resolution = resolution;
        let mut ok = 0;
        for (i, rom) in self.roms.iter().enumerate() {
            match ds18b20::set_resolution(&mut self.bus, rom, resolution) {
                Ok(()) => ok += 1,
                Err(e) => warn!("probe {i}: resolution write failed: {e}"),
            }
        }
        ok
    }

    /// Start the first conversion and wait it out, so the first cycle has
    /// real data. Call once before the control loop.
    pub fn prime(&mut self, delay: &mut impl DelayNs) {
        self.start_conversion();
        delay.delay_ms(self.resolution.conversion_time_ms());
    }

    /// ROM codes of the probes in use, in index order.
    pub fn roms(&self) -> &[RomCode] {
        &self.roms[..self.roms.len().min(self.expected)]
    }

    pub fn discovered(&self) -> usize {
        self.roms.len()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Read the pending conversion for every probe, then start the next.
    pub fn sample(&mut self) -> ProbeReadings {
        let mut readings = ProbeReadings::new();
        for i in 0..self.expected {
            let reading = match self.roms.get(i) {
                Some(rom) if self.conversion_pending => {
                    match ds18b20::read_celsius(&mut self.bus, rom) {
                        Ok(c) => ProbeReading::Celsius(c),
                        Err(e) => {
                            error!("probe {i}: read failed: {e}");
                            ProbeReading::Disconnected
                        }
                    }
                }
                _ => ProbeReading::Disconnected,
            };
            // Capacity is MAX_PROBES and expected is clamped to it.
            let _ = readings.push(reading);
        }

        self.start_conversion();
        readings
    }

    fn start_conversion(&mut self) {
        match ds18b20::start_conversion_all(&mut self.bus) {
            Ok(()) => self.conversion_pending = true,
            Err(e) => {
                error!("conversion start failed: {e}");
                self.conversion_pending = false;
            }
        }
    }
}

impl<B: OneWireBus> ProbePort for ProbeArray<B> {
    fn read_all(&mut self) -> ProbeReadings {
        self.sample()
    }

    fn probe_count(&self) -> usize {
        self.expected
    }
}
