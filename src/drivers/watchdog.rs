//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the control loop
//! stalls. A reset brings the heater output back up driven low, so a hung
//! loop can never leave the element energised.
//!
//! The control loop must call `feed()` once per cycle.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

/// Watchdog timeout as a multiple of the control cycle.
pub const CYCLES_PER_TIMEOUT: u32 = 5;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: core::cell::Cell<u32>,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT with a timeout
    /// of [`CYCLES_PER_TIMEOUT`] control cycles.
    pub fn new(cycle_interval_ms: u32) -> Self {
        let timeout_ms = cycle_interval_ms.saturating_mul(CYCLES_PER_TIMEOUT);

        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({timeout_ms} ms timeout, panic on trigger)");
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    timeout_ms,
                    subscribed,
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op, {timeout_ms} ms timeout");
            Self {
                timeout_ms,
                feeds: core::cell::Cell::new(0),
            }
        }
    }

    /// Feed the watchdog. Must be called at least once per timeout.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        self.feeds.set(self.feeds.get().wrapping_add(1));
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Number of feeds so far (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn feed_count(&self) -> u32 {
        self.feeds.get()
    }
}
