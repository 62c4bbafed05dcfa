//! Weighted mod-10 check digits for the UPC/EAN family.

use super::{ChecksumError, Symbology};

/// Computes the check digit for `payload` (the barcode without its trailing check digit).
///
/// Returns `None` when the symbology defines no check digit or the payload contains
/// anything other than ASCII digits.
pub fn check_digit(symbology: Symbology, payload: &str) -> Option<u8> {
    let anchor = symbology.rule().checksum_anchor?;
    let mut total: u32 = 0;
    for (i, ch) in payload.chars().enumerate() {
        let digit = ch.to_digit(10)?;
        let weight = if i % 2 == anchor { 3 } else { 1 };
        // payload length is unbounded, keep the running total reduced
        total = (total + digit * weight) % 10;
    }
    Some(((10 - total) % 10) as u8)
}

/// Verifies the final digit of `value` against the digits before it.
///
/// Always succeeds for symbologies without a check digit.
pub fn validate_checksum(symbology: Symbology, value: &str) -> Result<(), ChecksumError> {
    if !symbology.has_checksum() {
        return Ok(());
    }

    let mut chars = value.chars();
    let last = chars.next_back();
    let payload = chars.as_str();

    let expected = check_digit(symbology, payload);
    let actual = last.and_then(|c| c.to_digit(10)).map(|d| d as u8);

    match (expected, actual) {
        (Some(e), Some(a)) if e == a => Ok(()),
        _ => Err(ChecksumError { symbology, value: value.to_string(), expected, actual }),
    }
}
