//! Barcode validation and classification.
//!
//! A barcode arrives as a symbology tag plus a raw string. Validation runs in three
//! steps, each of which can reject the value with its own error type:
//!
//! 1. [`normalize`] trims surrounding whitespace and rejects empty input.
//! 2. [`validate_format`] checks length and character class against the symbology's rule.
//! 3. [`validate_checksum`] verifies the trailing check digit for UPC, EAN-13 and EAN-8.
//!
//! [`validate`] chains the three and returns the canonical barcode string. Everything
//! here is pure: no I/O, no logging, no shared mutable state.

mod checksum;
mod symbology;

use std::fmt;

use thiserror::Error;

pub use checksum::{check_digit, validate_checksum};
pub use symbology::{Symbology, SymbologyRule};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("barcode cannot be empty or non-string")]
pub struct EmptyInputError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("barcode type is required for validation")]
pub struct MissingSymbologyError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown barcode type '{tag}'")]
pub struct UnknownSymbologyError {
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormatError {
    pub symbology: Symbology,
    pub value: String,
    pub message: &'static str,
}

/// The check digit disagrees with the digits before it.
///
/// `expected` is `None` when the payload is not all digits, `actual` is `None`
/// when the final character is not a digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumError {
    pub symbology: Symbology,
    pub value: String,
    pub expected: Option<u8>,
    pub actual: Option<u8>,
}

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid check digit for {}", self.symbology)?;
        match (self.expected, self.actual) {
            (Some(e), Some(a)) => write!(f, ": expected {}, found {}", e, a),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ChecksumError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Empty(#[from] EmptyInputError),
    #[error(transparent)]
    MissingSymbology(#[from] MissingSymbologyError),
    #[error(transparent)]
    UnknownSymbology(#[from] UnknownSymbologyError),
    #[error(transparent)]
    BadFormat(#[from] FormatError),
    #[error(transparent)]
    BadChecksum(#[from] ChecksumError),
}

/// Trims surrounding whitespace; fails if nothing is left.
pub fn normalize(raw: &str) -> Result<String, EmptyInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmptyInputError);
    }
    Ok(trimmed.to_string())
}

/// Checks `value` against the full-string pattern registered for `symbology`.
pub fn validate_format(symbology: Symbology, value: &str) -> Result<String, FormatError> {
    if symbology.matches(value) {
        Ok(value.to_string())
    } else {
        Err(FormatError { symbology, value: value.to_string(), message: symbology.rule().message })
    }
}

/// Normalizes, format-checks and checksum-checks `raw`, returning the canonical barcode.
pub fn validate(symbology: Symbology, raw: &str) -> Result<String, ValidationError> {
    let normalized = normalize(raw)?;
    let formatted = validate_format(symbology, &normalized)?;
    validate_checksum(symbology, &formatted)?;
    Ok(formatted)
}

/// Resolves a symbology tag supplied by a caller and validates `raw` against it.
///
/// `raw` is `None` when the caller had no string to offer (absent or non-string field).
/// The barcode is normalized before the tag is resolved, so an empty barcode is
/// reported ahead of a missing or unknown type.
pub fn validate_tagged(
    tag: Option<&str>,
    raw: Option<&str>,
) -> Result<(Symbology, String), ValidationError> {
    let normalized = normalize(raw.ok_or(EmptyInputError)?)?;
    let symbology = match tag.map(str::trim) {
        None | Some("") => return Err(MissingSymbologyError.into()),
        Some(t) => t.parse::<Symbology>()?,
    };
    let value = validate(symbology, &normalized)?;
    Ok((symbology, value))
}
