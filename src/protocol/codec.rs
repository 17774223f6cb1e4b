//! Non-blocking command frame decoder.
//!
//! Wire format:
//! ```text
//! ┌─────┬──────────────────────────┬─────┐
//! │ '<' │ ASCII number (≤ 32 B)    │ '>' │
//! └─────┴──────────────────────────┴─────┘
//! ```
//!
//! The decoder accumulates bytes across calls, so a frame may arrive split
//! over any number of cycles. Bytes outside a frame are ignored. A `<`
//! inside a frame abandons the partial text and starts over. Text beyond
//! the buffer capacity is dropped and the frame is flagged `overflowed`,
//! but the frame still completes on the next `>`.

use super::number::parse_leading_f32;
use super::{END_MARKER, START_MARKER};
use crate::app::ports::ByteSource;
use crate::config::COMMAND_BUFFER_LEN;
use crate::error::ParseError;
use log::{debug, warn};

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Waiting for a start marker.
    Idle,
    /// Inside a frame, collecting text.
    Accumulating,
}

/// One completed command frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandFrame {
    /// Parsed value, or why the text was not a number.
    pub value: Result<f32, ParseError>,
    /// Some text was dropped because the buffer was full.
    pub overflowed: bool,
}

/// Streaming frame decoder with a fixed `N`-byte text buffer.
pub struct FrameDecoder<const N: usize = COMMAND_BUFFER_LEN> {
    state: DecoderState,
    buf: heapless::Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> Default for FrameDecoder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameDecoder<N> {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Idle,
            buf: heapless::Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte. Returns `Some(frame)` when `byte` closes a frame.
    pub fn feed_byte(&mut self, byte: u8) -> Option<CommandFrame> {
        match self.state {
            DecoderState::Idle => {
                if byte == START_MARKER {
                    self.begin_frame();
                }
                None
            }
            DecoderState::Accumulating => match byte {
                END_MARKER => Some(self.finish_frame()),
                START_MARKER => {
                    debug!("command frame restarted, dropping {} bytes", self.buf.len());
                    self.begin_frame();
                    None
                }
                _ => {
                    if self.buf.push(byte).is_err() && !self.overflowed {
                        warn!("command frame exceeds {} bytes, dropping excess", N);
                        self.overflowed = true;
                    }
                    None
                }
            },
        }
    }

    /// Drain currently available bytes from `source`, stopping after the
    /// first completed frame. Never blocks: returns `None` as soon as the
    /// source runs dry. Bytes after a completed frame stay queued.
    pub fn poll<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Option<CommandFrame> {
        loop {
            match source.read_byte() {
                Ok(Some(byte)) => {
                    if let Some(frame) = self.feed_byte(byte) {
                        return Some(frame);
                    }
                }
                Ok(None) => return None,
                Err(e) => {
                    warn!("command input read failed: {e}");
                    return None;
                }
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// True if the frame in progress has dropped bytes.
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Bytes collected for the frame in progress.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// Discard any partial frame and return to `Idle`.
    pub fn reset(&mut self) {
        self.state = DecoderState::Idle;
        self.buf.clear();
        self.overflowed = false;
    }

    // ── Internal ──────────────────────────────────────────────────

    fn begin_frame(&mut self) {
        self.state = DecoderState::Accumulating;
        self.buf.clear();
        self.overflowed = false;
    }

    fn finish_frame(&mut self) -> CommandFrame {
        let frame = CommandFrame {
            value: parse_leading_f32(&self.buf),
            overflowed: self.overflowed,
        };
        self.reset();
        frame
    }
}
