//! Unified error types for the controller firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! bootstrap path's error handling uniform. All variants are `Copy` so they
//! can be passed through the safety supervisor and FSM without allocation.
//! Nothing here unwinds the control loop: acquisition failures become
//! `ProbeReading::Disconnected`, safety failures become a stop mode.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// A probe could not be read.
    Probe(ProbeError),
    /// The probe set failed validation.
    Safety(ProbeFault),
    /// The serial link failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe(e) => write!(f, "probe: {e}"),
            Self::Safety(e) => write!(f, "safety: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<crate::config::ConfigError> for Error {
    fn from(e: crate::config::ConfigError) -> Self {
        match e {
            crate::config::ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Probe acquisition errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// No device answered the bus reset.
    NoPresence,
    /// Scratchpad or ROM CRC did not match.
    CrcMismatch,
    /// The bus pin could not be driven or sampled.
    Bus,
    /// ROM search saw an impossible bit pair (bus noise or a short).
    SearchCollision,
    /// The configuration register read back different from what was written.
    ConfigMismatch,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPresence => write!(f, "no presence pulse"),
            Self::CrcMismatch => write!(f, "CRC mismatch"),
            Self::Bus => write!(f, "bus pin error"),
            Self::SearchCollision => write!(f, "ROM search collision"),
            Self::ConfigMismatch => write!(f, "configuration read-back mismatch"),
        }
    }
}

impl From<ProbeError> for Error {
    fn from(e: ProbeError) -> Self {
        Self::Probe(e)
    }
}

// ---------------------------------------------------------------------------
// Safety faults
// ---------------------------------------------------------------------------

/// Why a cycle's probe set was judged unsafe. Any of these latches
/// `SafetyMode::FaultStop` for the rest of the power cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeFault {
    /// A probe reported the disconnected condition.
    Disconnected { probe: usize },
    /// A probe read outside the legal interval.
    OutOfRange { probe: usize, celsius: f32 },
    /// No probe produced a usable (non-NaN) value, so the mean is undefined.
    NoValidReadings,
}

impl ProbeFault {
    /// Wire-independent numeric code for logs.
    pub const fn code(self) -> u8 {
        match self {
            Self::Disconnected { .. } => 1,
            Self::OutOfRange { .. } => 2,
            Self::NoValidReadings => 3,
        }
    }
}

impl fmt::Display for ProbeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { probe } => write!(f, "probe {probe} disconnected"),
            Self::OutOfRange { probe, celsius } => {
                write!(f, "probe {probe} out of range ({celsius:.2}\u{00b0}C)")
            }
            Self::NoValidReadings => write!(f, "no valid probe readings"),
        }
    }
}

impl From<ProbeFault> for Error {
    fn from(e: ProbeFault) -> Self {
        Self::Safety(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    UartReadFailed,
    UartWriteFailed,
    /// Status line did not fit the fixed line buffer.
    LineTooLong,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UartReadFailed => write!(f, "UART read failed"),
            Self::UartWriteFailed => write!(f, "UART write failed"),
            Self::LineTooLong => write!(f, "status line too long"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Command parsing errors
// ---------------------------------------------------------------------------

/// Why the text of a command frame is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The frame held nothing but whitespace.
    Empty,
    /// The text does not start with a number.
    NoNumber,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty frame"),
            Self::NoNumber => write!(f, "no numeric prefix"),
        }
    }
}
