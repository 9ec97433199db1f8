//! Fixed-point math and lenient numeric parsing.
//!
//! Catalog quantities (speeds, build times, radii) are stored as
//! fixed-point numbers so that resolution is bit-for-bit reproducible.
//! Parsing is deliberately forgiving: catalog attributes are read with
//! C-style "leading number" semantics, and anything unparseable is zero.

use std::str::FromStr;

use fixed::types::I32F32;

/// Fixed-point number type for all catalog quantities.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Serialize fixed-point numbers as plain decimal numbers.
///
/// Used by the export records, whose consumers expect ordinary JSON
/// numbers rather than raw bit patterns.
pub mod decimal_serde {
    use super::Fixed;
    use serde::Serializer;

    /// Serialize a fixed-point number as a decimal.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.to_num::<f64>())
    }
}

/// Return the longest prefix of `text` that looks like a number.
///
/// Accepts an optional sign, digits and (if `fractional`) one decimal point.
fn numeric_prefix(text: &str, fractional: bool) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        if b.is_ascii_digit() {
            end += 1;
        } else if b == b'.' && fractional && !seen_dot {
            seen_dot = true;
            end += 1;
        } else {
            break;
        }
    }
    &text[..end]
}

/// Parse the leading integer of `text`, like C's `atoi`.
///
/// Leading whitespace is skipped, trailing garbage is ignored and
/// anything without digits yields `0`.
#[must_use]
pub fn parse_int(text: &str) -> i64 {
    let prefix = numeric_prefix(text.trim_start(), false);
    prefix.parse().unwrap_or(0)
}

/// Parse the leading integer of `text` as an index.
///
/// Negative values clamp to zero.
#[must_use]
pub fn parse_index(text: &str) -> usize {
    usize::try_from(parse_int(text)).unwrap_or(0)
}

/// Parse the leading decimal number of `text` as a fixed-point value.
#[must_use]
pub fn parse_fixed(text: &str) -> Fixed {
    let trimmed = text.trim();
    if let Ok(value) = Fixed::from_str(trimmed) {
        return value;
    }

    let prefix = numeric_prefix(trimmed, true);
    let (negative, digits) = match prefix.as_bytes().first() {
        Some(b'-') => (true, &prefix[1..]),
        Some(b'+') => (false, &prefix[1..]),
        _ => (false, prefix),
    };
    let digits = digits.trim_end_matches('.');
    if !digits.bytes().any(|b| b.is_ascii_digit()) {
        return Fixed::ZERO;
    }

    let normalized = if digits.starts_with('.') {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let magnitude = Fixed::from_str(&normalized).unwrap_or(Fixed::ZERO);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
