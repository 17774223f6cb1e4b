//! Lenient decimal parsing for command text.
//!
//! Follows the classic C `atof` contract the host tooling was written
//! against: leading whitespace is skipped, the longest numeric prefix is
//! converted and anything after it is ignored (`"42abc"` is 42). The words
//! `inf`, `infinity` and `nan` are accepted case-insensitively. Hexadecimal
//! floats are not. Unlike `atof`, text with no numeric prefix is reported
//! instead of silently becoming 0.

use crate::error::ParseError;

/// Parse the leading number of `text`.
pub fn parse_leading_f32(text: &[u8]) -> Result<f32, ParseError> {
    let start = text
        .iter()
        .position(|b| !is_c_space(*b))
        .ok_or(ParseError::Empty)?;
    let rest = &text[start..];

    let sign_len = usize::from(matches!(rest.first(), Some(b'+' | b'-')));
    let negative = rest.first() == Some(&b'-');
    let body = &rest[sign_len..];

    if let Some(value) = parse_word(body) {
        return Ok(if negative { -value } else { value });
    }

    let len = numeric_prefix_len(body).ok_or(ParseError::NoNumber)?;
    let number = core::str::from_utf8(&rest[..sign_len + len]).map_err(|_| ParseError::NoNumber)?;
    number.parse::<f32>().map_err(|_| ParseError::NoNumber)
}

/// `isspace` in the C locale.
fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

fn parse_word(body: &[u8]) -> Option<f32> {
    if starts_with_ignore_case(body, b"inf") {
        Some(f32::INFINITY)
    } else if starts_with_ignore_case(body, b"nan") {
        Some(f32::NAN)
    } else {
        None
    }
}

/// Length of `digits [. digits] [e [sign] digits]`, requiring at least one
/// mantissa digit. An exponent marker without digits is not consumed.
fn numeric_prefix_len(body: &[u8]) -> Option<usize> {
    let count_digits = |from: usize| body[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = count_digits(0);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if body.get(end) == Some(&b'.') {
        frac_digits = count_digits(end + 1);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(body.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(body.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    Some(end)
}
