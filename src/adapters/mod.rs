//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                     |
//! |------------|---------------------|---------------------------------|
//! | `hardware` | ProbePort           | DS18B20 1-Wire bus / sim store  |
//! |            | HeaterPort          | Heater SSR GPIO                 |
//! | `log_sink` | EventSink           | Console log output              |
//! | `serial`   | SerialLink          | Protocol UART / in-memory queue |

pub mod hardware;
pub mod log_sink;
pub mod serial;
