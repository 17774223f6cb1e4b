//! Cycle-count dwell filter between heater transitions.
//!
//! The counter counts evaluated cycles since the last physical switch,
//! saturating at the threshold. A change of output is only let through once
//! the counter has reached the threshold, so two switches are always at
//! least `threshold` cycles apart. The counter starts at the threshold so
//! the very first transition after boot is not delayed.

/// Debounce filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    threshold: u8,
    counter: u8,
}

impl Debouncer {
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold,
            counter: threshold,
        }
    }

    /// Run one cycle through the filter and return the permitted command.
    ///
    /// Increments the counter (clamped), then returns `intent` if it differs
    /// from `actual` and the dwell has elapsed, otherwise `actual`. The
    /// caller resets the filter when it actually switches the output.
    pub fn filter(&mut self, intent: bool, actual: bool) -> bool {
        self.counter = self.counter.saturating_add(1).min(self.threshold);
        if intent != actual && self.ready() {
            intent
        } else {
            actual
        }
    }

    /// Restart the dwell window after a physical transition.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// True once enough cycles have passed for a transition.
    pub fn ready(&self) -> bool {
        self.counter >= self.threshold
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}
