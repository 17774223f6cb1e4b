//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerService (domain)
//! ```
//!
//! Driven adapters (probes, heater output, serial link, event sinks)
//! implement these traits. The
//! [`ControllerService`](super::service::ControllerService) consumes them
//! via generics, so the domain core never touches hardware directly.
//!
//! All port errors are typed. Probe acquisition has no error path: a probe
//! that cannot be read is reported as
//! [`ProbeReading::Disconnected`](crate::fsm::context::ProbeReading::Disconnected).

use crate::error::CommsError;
use crate::fsm::context::ProbeReadings;

// ───────────────────────────────────────────────────────────────
// Probe port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait ProbePort {
    /// Read every configured probe, in index order.
    ///
    /// [`ProbeReading::Disconnected`](crate::fsm::context::ProbeReading::Disconnected) marks a probe that did not answer.
    fn read_all(&mut self) -> ProbeReadings;

    /// Number of probes this port reports.
    fn probe_count(&self) -> usize;
}

// ───────────────────────────────────────────────────────────────
// Heater port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the single heater output line.
pub trait HeaterPort {
    /// Drive the heater output (true = energised).
    fn set_heater(&mut self, on: bool);

    /// Level last written.
    fn is_heater_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Serial link port (driven adapter: domain ↔ protocol UART)
// ───────────────────────────────────────────────────────────────

/// Non-blocking byte input.
pub trait ByteSource {
    /// Next buffered byte, or `Ok(None)` if nothing is available right now.
    /// Must never block.
    fn read_byte(&mut self) -> Result<Option<u8>, CommsError>;
}

/// The full protocol link: command bytes in, status lines out.
pub trait SerialLink: ByteSource {
    /// Write `bytes` to the link.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured
/// [`ControllerEvent`](super::events::ControllerEvent)s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControllerEvent);
}

