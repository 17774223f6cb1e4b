//! Serial protocol link adapters.
//!
//! | Adapter      | Target  | Backing                              |
//! |--------------|---------|--------------------------------------|
//! | `UartLink`   | espidf  | `esp-idf-hal` `UartDriver`, UART1    |
//! | `MemoryLink` | any     | in-memory queues (host runs, tests)  |
//!
//! Reads never block: the UART driver is polled with a zero timeout.

use std::collections::VecDeque;

use crate::app::ports::{ByteSource, SerialLink};
use crate::error::CommsError;
use crate::protocol::LINE_TERMINATOR;

#[cfg(target_os = "espidf")]
pub use esp::UartLink;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::delay::NON_BLOCK;
    use esp_idf_svc::hal::uart::UartDriver;
    use log::warn;

    use crate::app::ports::{ByteSource, SerialLink};
    use crate::error::CommsError;

    /// Protocol link on a hardware UART.
    pub struct UartLink<'d> {
        uart: UartDriver<'d>,
    }

    impl<'d> UartLink<'d> {
        pub fn new(uart: UartDriver<'d>) -> Self {
            Self { uart }
        }
    }

    impl ByteSource for UartLink<'_> {
        fn read_byte(&mut self) -> Result<Option<u8>, CommsError> {
            let mut byte = [0u8; 1];
            match self.uart.read(&mut byte, NON_BLOCK) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(byte[0])),
                Err(e) => {
                    warn!("UART read error: {e}");
                    Err(CommsError::UartReadFailed)
                }
            }
        }
    }

    impl SerialLink for UartLink<'_> {
        fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), CommsError> {
            while !bytes.is_empty() {
                let n = self
                    .uart
                    .write(bytes)
                    .map_err(|_| CommsError::UartWriteFailed)?;
                if n == 0 {
                    return Err(CommsError::UartWriteFailed);
                }
                bytes = &bytes[n..];
            }
            Ok(())
        }
    }
}

/// In-memory protocol link.
#[derive(Default)]
pub struct MemoryLink {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    fail_writes: bool,
}

impl MemoryLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the controller to read.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Bytes queued but not yet read.
    pub fn pending_input(&self) -> usize {
        self.rx.len()
    }

    /// Everything written so far.
    pub fn output(&self) -> &[u8] {
        &self.tx
    }

    /// Drain written bytes as complete lines (terminators stripped).
    /// A trailing partial line stays buffered.
    pub fn take_lines(&mut self) -> Vec<String> {
        let text = String::from_utf8_lossy(&self.tx).into_owned();
        let mut lines: Vec<String> = text.split(LINE_TERMINATOR).map(String::from).collect();
        let rest = lines.pop().unwrap_or_default();
        self.tx = rest.into_bytes();
        lines
    }

    /// Make every subsequent write fail.
    pub fn set_write_failure(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl ByteSource for MemoryLink {
    fn read_byte(&mut self) -> Result<Option<u8>, CommsError> {
        Ok(self.rx.pop_front())
    }
}

impl SerialLink for MemoryLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), CommsError> {
        if self.fail_writes {
            return Err(CommsError::UartWriteFailed);
        }
        self.tx.extend_from_slice(bytes);
        Ok(())
    }
}
