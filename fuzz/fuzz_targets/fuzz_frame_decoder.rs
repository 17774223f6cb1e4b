//! Fuzz target: `FrameDecoder::feed_byte`
//!
//! Drives arbitrary byte sequences into the command frame decoder and
//! asserts that it never panics, never holds more than its fixed buffer,
//! and only completes frames on an end marker.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use ezbake::config::COMMAND_BUFFER_LEN;
use ezbake::protocol::codec::{DecoderState, FrameDecoder};
use ezbake::protocol::END_MARKER;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder: FrameDecoder = FrameDecoder::new();

    for &byte in data {
        if let Some(frame) = decoder.feed_byte(byte) {
            assert_eq!(byte, END_MARKER, "frame completed on a non-terminator");
            assert_eq!(decoder.state(), DecoderState::Idle);
            let _ = frame.value;
        }
        assert!(decoder.pending_len() <= COMMAND_BUFFER_LEN);
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    assert_eq!(decoder.pending_len(), 0);
    for &byte in data {
        let _ = decoder.feed_byte(byte);
    }
});
