//! Per-cycle status line.
//!
//! ```text
//! <t0> <t1> ... <tN-1> <heater 0|1> <setpoint> <mode 0|1|2>\r\n
//! ```
//!
//! Temperatures and the setpoint carry two decimals. NaN prints as `nan`;
//! a disconnected probe prints as the `-127.00` sentinel the host tooling
//! already understands.

use super::LINE_TERMINATOR;
use crate::config::MAX_PROBES;
use crate::error::CommsError;
use crate::fsm::SafetyMode;
use crate::fsm::context::{DISCONNECTED_SENTINEL_C, ProbeReading, ProbeReadings};
use core::fmt::Write;

/// Widest two-decimal rendering of a finite f32: `-f32::MAX` is a sign,
/// 39 integer digits and `.00`.
pub const CELSIUS_FIELD_MAX: usize = 43;

/// Capacity of one rendered status line: `MAX_PROBES` readings plus the
/// setpoint at full width with separators, the heater and mode digits with
/// theirs, and the terminator.
pub const STATUS_LINE_LEN: usize =
    (MAX_PROBES + 1) * (CELSIUS_FIELD_MAX + 1) + 2 + 1 + LINE_TERMINATOR.len();

/// A rendered status line, terminator included.
pub type StatusLine = heapless::String<STATUS_LINE_LEN>;

/// Everything the status line reports for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub readings: ProbeReadings,
    /// Heater command after this cycle's actuation.
    pub heater_on: bool,
    pub setpoint_c: f32,
    pub mode: SafetyMode,
}

impl StatusReport {
    /// Render the wire line.
    pub fn render(&self) -> Result<StatusLine, CommsError> {
        format_status(&self.readings, self.heater_on, self.setpoint_c, self.mode)
    }
}

/// Format one status line into a fixed buffer.
pub fn format_status(
    readings: &[ProbeReading],
    heater_on: bool,
    setpoint_c: f32,
    mode: SafetyMode,
) -> Result<StatusLine, CommsError> {
    let mut line = StatusLine::new();
    write_status(&mut line, readings, heater_on, setpoint_c, mode)
        .map_err(|_| CommsError::LineTooLong)?;
    Ok(line)
}

fn write_status(
    out: &mut StatusLine,
    readings: &[ProbeReading],
    heater_on: bool,
    setpoint_c: f32,
    mode: SafetyMode,
) -> core::fmt::Result {
    for reading in readings {
        let celsius = reading.celsius().unwrap_or(DISCONNECTED_SENTINEL_C);
        write_celsius(out, celsius)?;
        out.write_char(' ')?;
    }
    out.write_char(if heater_on { '1' } else { '0' })?;
    out.write_char(' ')?;
    write_celsius(out, setpoint_c)?;
    write!(out, " {}", mode.code())?;
    out.write_str(LINE_TERMINATOR)
}

fn write_celsius(out: &mut StatusLine, celsius: f32) -> core::fmt::Result {
    if celsius.is_nan() {
        out.write_str("nan")
    } else if celsius == 0.0 {
        // Avoid "-0.00".
        out.write_str("0.00")
    } else {
        write!(out, "{celsius:.2}")
    }
}
