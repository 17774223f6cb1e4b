//! Hysteresis-free on/off control.
//!
//! The heater is wanted whenever the mean chamber temperature is strictly
//! below the setpoint. There is no dead-band and no proportional term; the
//! debounce filter is the only thing limiting switching rate.

use crate::fsm::context::ProbeReading;

/// Mean of every usable reading (disconnected probes and NaN excluded).
/// Returns `None` when no probe produced a usable value.
pub fn mean_celsius(readings: &[ProbeReading]) -> Option<f32> {
    let (sum, count) = readings
        .iter()
        .filter_map(|r| r.celsius())
        .filter(|c| !c.is_nan())
        .fold((0.0f32, 0u32), |(sum, n), c| (sum + c, n + 1));

    (count > 0).then(|| sum / count as f32)
}

/// Bang-bang decision: heat while below the setpoint.
pub fn heater_intent(mean_c: f32, setpoint_c: f32) -> bool {
    mean_c < setpoint_c
}
