//! Heater control law: the bang-bang decision and its debounce filter.

pub mod bang_bang;
pub mod debounce;

pub use bang_bang::{heater_intent, mean_celsius};
pub use debounce::Debouncer;
