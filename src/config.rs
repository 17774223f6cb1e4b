//! Controller configuration parameters
//!
//! All tunable parameters for the heater controller. Defaults match the
//! deployed chamber; there is no persistence, so every boot starts from
//! [`ControllerConfig::default()`].

use serde::{Deserialize, Serialize};

/// Serial link baud rate for the command/status protocol.
pub const SERIAL_BAUDRATE: u32 = 9600;
/// Minimum number of consecutive cycles between heater transitions.
pub const DEBOUNCE_LOOPS: u8 = 2;
/// Lowest probe reading (°C) still considered physically plausible.
pub const MIN_LEGAL_TEMP_C: f32 = -20.0;
/// Highest probe reading (°C) still considered safe.
pub const MAX_LEGAL_TEMP_C: f32 = 150.0;
/// Command values at or above this are emergency-stop requests.
pub const ESTOP_THRESHOLD: f32 = 1000.0;

/// Number of probes wired on the chamber harness.
pub const DEFAULT_PROBE_COUNT: u8 = 6;
/// Upper bound on probes a single bus is scanned for.
pub const MAX_PROBES: usize = 8;
/// Capacity of the in-progress command frame buffer (bytes).
pub const COMMAND_BUFFER_LEN: usize = 32;

/// Core controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Probes ---
    /// Number of probes expected on the 1-Wire bus.
    pub probe_count: u8,
    /// Worst-case DS18B20 conversion time (milliseconds, 12-bit = 750).
    pub conversion_time_ms: u32,

    // --- Safety ---
    /// Lower bound of the legal temperature interval (Celsius, inclusive).
    pub min_legal_temp_c: f32,
    /// Upper bound of the legal temperature interval (Celsius, inclusive).
    /// Setpoints must be strictly below this.
    pub max_legal_temp_c: f32,
    /// Command value at or above which an emergency stop is latched.
    pub estop_threshold: f32,

    // --- Actuator ---
    /// Cycles that must elapse between heater transitions.
    pub debounce_cycles: u8,

    // --- Timing ---
    /// Control cycle period (milliseconds). The effective debounce dwell
    /// time is `debounce_cycles * cycle_interval_ms`.
    pub cycle_interval_ms: u32,

    // --- Comms ---
    /// Protocol UART baud rate.
    pub serial_baudrate: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Probes
            probe_count: DEFAULT_PROBE_COUNT,
            conversion_time_ms: 750,

            // Safety
            min_legal_temp_c: MIN_LEGAL_TEMP_C,
            max_legal_temp_c: MAX_LEGAL_TEMP_C,
            estop_threshold: ESTOP_THRESHOLD,

            // Actuator
            debounce_cycles: DEBOUNCE_LOOPS,

            // Timing
            cycle_interval_ms: 1000, // 1 Hz

            // Comms
            serial_baudrate: SERIAL_BAUDRATE,
        }
    }
}

impl ControllerConfig {
    /// Reject inconsistent parameter sets before the controller starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe_count == 0 || self.probe_count as usize > MAX_PROBES {
            return Err(ConfigError::ValidationFailed("probe_count must be 1..=8"));
        }
        if !(self.min_legal_temp_c < self.max_legal_temp_c) {
            return Err(ConfigError::ValidationFailed(
                "min_legal_temp_c must be below max_legal_temp_c",
            ));
        }
        if !(self.estop_threshold > self.max_legal_temp_c) {
            return Err(ConfigError::ValidationFailed(
                "estop_threshold must be above max_legal_temp_c",
            ));
        }
        if self.debounce_cycles == 0 {
            return Err(ConfigError::ValidationFailed("debounce_cycles must be non-zero"));
        }
        if self.cycle_interval_ms < self.conversion_time_ms {
            return Err(ConfigError::ValidationFailed(
                "cycle_interval_ms must cover a probe conversion",
            ));
        }
        if self.serial_baudrate == 0 {
            return Err(ConfigError::ValidationFailed("serial_baudrate must be non-zero"));
        }
        Ok(())
    }

    /// Wall-clock length of the debounce window in milliseconds.
    pub fn debounce_window_ms(&self) -> u32 {
        self.debounce_cycles as u32 * self.cycle_interval_ms
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn defaults_match_deployment_constants() {
        let c = ControllerConfig::default();
        assert_eq!(c.debounce_cycles, 2);
        assert_eq!(c.serial_baudrate, 9600);
        assert!((c.min_legal_temp_c - -20.0).abs() < f32::EPSILON);
        assert!((c.max_legal_temp_c - 150.0).abs() < f32::EPSILON);
        assert!((c.estop_threshold - 1000.0).abs() < f32::EPSILON);
    }

    #[test]
    fn inverted_bounds_rejected() {
        let c = ControllerConfig {
            min_legal_temp_c: 200.0,
            ..ControllerConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn probe_count_bounds() {
        let zero = ControllerConfig { probe_count: 0, ..ControllerConfig::default() };
        assert!(zero.validate().is_err());
        let many = ControllerConfig { probe_count: 9, ..ControllerConfig::default() };
        assert!(many.validate().is_err());
        let max = ControllerConfig { probe_count: 8, ..ControllerConfig::default() };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn cycle_must_cover_conversion() {
        let c = ControllerConfig { cycle_interval_ms: 500, ..ControllerConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn estop_threshold_must_exceed_legal_max() {
        let c = ControllerConfig { estop_threshold: 100.0, ..ControllerConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn debounce_window_scales_with_cycle_period() {
        let c = ControllerConfig { cycle_interval_ms: 2000, ..ControllerConfig::default() };
        assert_eq!(c.debounce_window_ms(), 4000);
    }

    #[test]
    fn serde_roundtrip() {
        let c = ControllerConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }
}
