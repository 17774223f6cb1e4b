//! Integration tests for the serial protocol: command frames in through a
//! `MemoryLink`, status lines rendered for the wire.

use ezbake::adapters::serial::MemoryLink;
use ezbake::app::ports::SerialLink;
use ezbake::error::{CommsError, ParseError};
use ezbake::fsm::SafetyMode;
use ezbake::fsm::context::ProbeReading::{Celsius, Disconnected};
use ezbake::protocol::codec::{DecoderState, FrameDecoder};
use ezbake::protocol::status::{StatusReport, format_status};

// ── Frame decoding over a link ────────────────────────────────

#[test]
fn byte_by_byte_delivery_yields_one_value() {
    let mut link = MemoryLink::new();
    let mut decoder: FrameDecoder = FrameDecoder::new();
    let mut values = Vec::new();

    for &byte in b"<42.5>" {
        link.push_input(&[byte]);
        match decoder.poll(&mut link) {
            Some(frame) => values.push(frame.value),
            None => assert!(values.is_empty(), "frame re-delivered"),
        }
    }
    assert_eq!(values, vec![Ok(42.5)]);
    assert_eq!(decoder.poll(&mut link), None);
}

#[test]
fn noise_between_frames_is_skipped() {
    let mut link = MemoryLink::new();
    let mut decoder: FrameDecoder = FrameDecoder::new();
    link.push_input(b"garbage\r\n>>12<7>tail");

    let frame = decoder.poll(&mut link).unwrap();
    assert_eq!(frame.value, Ok(7.0));
    assert_eq!(link.pending_input(), 4);
    assert_eq!(decoder.poll(&mut link), None);
    assert_eq!(decoder.state(), DecoderState::Idle);
}

#[test]
fn restart_marker_drops_partial_text() {
    let mut link = MemoryLink::new();
    let mut decoder: FrameDecoder = FrameDecoder::new();
    link.push_input(b"<99<3.25>");
    assert_eq!(decoder.poll(&mut link).map(|f| f.value), Some(Ok(3.25)));
}

#[test]
fn partial_frame_survives_dry_link() {
    let mut link = MemoryLink::new();
    let mut decoder: FrameDecoder = FrameDecoder::new();
    link.push_input(b"<12");
    assert_eq!(decoder.poll(&mut link), None);
    assert_eq!(decoder.state(), DecoderState::Accumulating);
    assert_eq!(decoder.pending_len(), 2);

    link.push_input(b".5>");
    assert_eq!(decoder.poll(&mut link).map(|f| f.value), Some(Ok(12.5)));
}

#[test]
fn empty_and_text_frames_are_errors() {
    let mut decoder: FrameDecoder = FrameDecoder::new();
    let mut link = MemoryLink::new();
    link.push_input(b"<><x1>");
    assert_eq!(decoder.poll(&mut link).map(|f| f.value), Some(Err(ParseError::Empty)));
    assert_eq!(decoder.poll(&mut link).map(|f| f.value), Some(Err(ParseError::NoNumber)));
}

#[test]
fn leading_number_wins_over_trailing_junk() {
    let mut decoder: FrameDecoder = FrameDecoder::new();
    let mut link = MemoryLink::new();
    link.push_input(b"< 37.5C>");
    assert_eq!(decoder.poll(&mut link).map(|f| f.value), Some(Ok(37.5)));
}

#[test]
fn overflow_flag_clears_with_next_frame() {
    let mut decoder: FrameDecoder = FrameDecoder::new();
    let mut link = MemoryLink::new();
    link.push_input(&[b'1'; 64]);
    assert_eq!(decoder.poll(&mut link), None);

    link.push_input(b"<");
    link.push_input(&[b'1'; 40]);
    link.push_input(b"><5>");
    let long = decoder.poll(&mut link).unwrap();
    assert!(long.overflowed);
    let short = decoder.poll(&mut link).unwrap();
    assert!(!short.overflowed);
    assert_eq!(short.value, Ok(5.0));
}

// ── Status lines ──────────────────────────────────────────────

#[test]
fn six_probe_line_layout() {
    let readings = [
        Celsius(20.0),
        Celsius(21.25),
        Celsius(-3.5),
        Celsius(f32::NAN),
        Disconnected,
        Celsius(100.0),
    ];
    let line = format_status(&readings, true, 37.5, SafetyMode::Normal).unwrap();
    assert_eq!(
        line.as_str(),
        "20.00 21.25 -3.50 nan -127.00 100.00 1 37.50 0\r\n"
    );
    assert_eq!(line.split(' ').count(), readings.len() + 3);
}

#[test]
fn report_is_written_to_link() {
    let report = StatusReport {
        readings: [Celsius(25.0)].into_iter().collect(),
        heater_on: false,
        setpoint_c: 0.0,
        mode: SafetyMode::OperatorStop,
    };
    let mut link = MemoryLink::new();
    link.write_all(report.render().unwrap().as_bytes()).unwrap();
    assert_eq!(link.take_lines(), vec!["25.00 0 0.00 1".to_string()]);

    link.set_write_failure(true);
    assert_eq!(
        link.write_all(report.render().unwrap().as_bytes()),
        Err(CommsError::UartWriteFailed)
    );
}
