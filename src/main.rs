//! EzBake Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed-period cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        UartLink          LogEventSink         │
//! │  (Probe+Heater)         (SerialLink)      (EventSink)          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControllerService (pure logic)              │    │
//! │  │  Decoder · Safety · FSM · Debounce                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Watchdog (fed every cycle)                                    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Instant;

use anyhow::{Result, anyhow};
use log::{info, warn};

use esp_idf_svc::hal::delay::{Ets, FreeRtos};
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_svc::hal::units::Hertz;

use ezbake::adapters::hardware::HardwareAdapter;
use ezbake::adapters::log_sink::LogEventSink;
use ezbake::adapters::serial::UartLink;
use ezbake::app::service::ControllerService;
use ezbake::config::ControllerConfig;
use ezbake::drivers::heater::HeaterDriver;
use ezbake::drivers::hw_init;
use ezbake::drivers::onewire::BitBangOneWire;
use ezbake::drivers::watchdog::Watchdog;
use ezbake::error::Error;
use ezbake::pins;
use ezbake::sensors::ProbeArray;
use ezbake::sensors::ds18b20::Resolution;

// ── Pin bindings ──────────────────────────────────────────────

// esp-idf-hal hands out pins as typed fields, so `main` names them
// directly. Moving a pin in `pins.rs` without updating the field fails here.
const _: () = {
    assert!(pins::ONE_WIRE_BUS == 2, "update gpio.gpio2 for pins::ONE_WIRE_BUS");
    assert!(pins::PROTOCOL_UART_TX_GPIO == 17, "update gpio.gpio17 for the UART TX pin");
    assert!(pins::PROTOCOL_UART_RX_GPIO == 18, "update gpio.gpio18 for the UART RX pin");
};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  EzBake v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Heater output low before anything else ─────────────
    hw_init::init_peripherals().map_err(Error::from)?;

    // ── 3. Configuration ──────────────────────────────────────
    let config = ControllerConfig::default();
    config.validate().map_err(Error::from)?;
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {json}"),
        Err(e) => warn!("Config not printable: {e}"),
    }

    // ── 4. Probes on the 1-Wire bus ───────────────────────────
    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;

    let one_wire_pin = PinDriver::input_output_od(gpio.gpio2)?;
    let bus = BitBangOneWire::new(one_wire_pin, Ets)
        .map_err(|e| anyhow!("1-Wire GPIO{} init failed: {e}", pins::ONE_WIRE_BUS))?;

    let mut probes = ProbeArray::discover(bus, usize::from(config.probe_count));
    let resolution = Resolution::for_budget(config.conversion_time_ms);
    let configured = probes.configure(resolution);
    info!(
        "Probes: {} discovered, {} set to {:?} ({} ms conversion)",
        probes.discovered(),
        configured,
        resolution,
        resolution.conversion_time_ms()
    );
    probes.prime(&mut FreeRtos);

    // ── 5. Protocol UART ──────────────────────────────────────
    let uart_config = UartConfig::default().baudrate(Hertz(config.serial_baudrate));
    let uart = UartDriver::new(
        peripherals.uart1,
        gpio.gpio17,
        gpio.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_config,
    )?;
    info!("Protocol UART1 at {} baud", config.serial_baudrate);

    // ── 6. Construct adapters + service ───────────────────────
    let mut hw = HardwareAdapter::new(probes, HeaterDriver::new());
    let mut link = UartLink::new(uart);
    let mut log_sink = LogEventSink::new();

    let mut service = ControllerService::new(config.clone());
    service.start(&mut hw, &mut log_sink);

    let watchdog = Watchdog::new(config.cycle_interval_ms);

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    loop {
        let started = Instant::now();

        service.tick(&mut hw, &mut link, &mut log_sink);
        watchdog.feed();

        // Keep the period fixed so the debounce dwell is predictable.
        let elapsed_ms = u32::try_from(started.elapsed().as_millis()).unwrap_or(u32::MAX);
        if elapsed_ms > config.cycle_interval_ms {
            warn!(
                "Cycle overran: {} ms > {} ms",
                elapsed_ms, config.cycle_interval_ms
            );
        }
        FreeRtos::delay_ms(config.cycle_interval_ms.saturating_sub(elapsed_ms));
    }
}
