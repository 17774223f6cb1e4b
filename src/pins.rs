//! GPIO / peripheral pin assignments for the controller board.
//!
//! Single source of truth. Every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Temperature probes (DS18B20 on a shared 1-Wire bus, 4.7 kΩ pull-up)
// ---------------------------------------------------------------------------

/// Open-drain 1-Wire data line.
pub const ONE_WIRE_BUS: i32 = 2;

// ---------------------------------------------------------------------------
// Heater (SSR input, active HIGH = energised)
// ---------------------------------------------------------------------------

/// Digital output driving the heater solid-state relay.
///
/// GPIO3 is UART0 RX on the classic ESP32 and a strapping pin on the
/// ESP32-S3. On either part the console must not use UART0 RX, and the SSR
/// input must not pull the line during reset. `hw_init` drives it low
/// before anything else runs.
pub const OUTPUT_PIN: i32 = 3;

// ---------------------------------------------------------------------------
// Protocol UART (UART1; UART0 stays on the log console)
// ---------------------------------------------------------------------------

pub const PROTOCOL_UART_TX_GPIO: i32 = 17;
pub const PROTOCOL_UART_RX_GPIO: i32 = 18;
