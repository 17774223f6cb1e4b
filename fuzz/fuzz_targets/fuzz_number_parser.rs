//! Fuzz target: `parse_leading_f32`
//!
//! Any byte string must parse or fail cleanly. A successful parse of pure
//! decimal text must agree with the standard library.
//!
//! cargo fuzz run fuzz_number_parser

#![no_main]

use ezbake::protocol::number::parse_leading_f32;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let result = parse_leading_f32(data);

    if let Ok(text) = core::str::from_utf8(data) {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            let expected: f32 = text.parse().expect("digits parse");
            assert_eq!(result, Ok(expected));
        }
    }
});
