//! Line-oriented serial protocol.
//!
//! Host → controller: framed numeric commands, `<42.5>`.
//! Controller → host: one space-separated status line per cycle.

pub mod codec;
pub mod number;
pub mod status;

/// Opens a command frame.
pub const START_MARKER: u8 = b'<';
/// Closes a command frame.
pub const END_MARKER: u8 = b'>';
/// Terminates every status line.
pub const LINE_TERMINATOR: &str = "\r\n";
