//! Symbology names and the per-symbology format rule table.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::UnknownSymbologyError;

/// A barcode encoding standard.
///
/// The serde representation is the wire name stored in the `products.barcode_type`
/// column and accepted in request bodies (`"UPC"`, `"EAN-13"`, `"Code128"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    #[serde(rename = "UPC")]
    Upc,
    #[serde(rename = "EAN-13")]
    Ean13,
    #[serde(rename = "EAN-8")]
    Ean8,
    #[serde(rename = "Code128")]
    Code128,
    #[serde(rename = "QRCode")]
    QrCode,
    #[serde(rename = "ITF-14")]
    Itf14,
    #[serde(rename = "Code39", alias = "Code29")]
    Code39,
}

/// Length, character class and checksum policy for one symbology.
#[derive(Debug)]
pub struct SymbologyRule {
    pub symbology: Symbology,
    pub name: &'static str,
    /// Exact length in characters, `None` for variable-length symbologies.
    pub length: Option<usize>,
    /// Anchored pattern the whole value must match.
    pub pattern: &'static str,
    pub message: &'static str,
    /// Payload index parity that receives weight 3, `None` when no check digit is defined.
    pub checksum_anchor: Option<usize>,
}

impl SymbologyRule {
    pub fn has_checksum(&self) -> bool {
        self.checksum_anchor.is_some()
    }
}

// Indexed by `Symbology::index`.
static RULES: [SymbologyRule; 7] = [
    SymbologyRule {
        symbology: Symbology::Upc,
        name: "UPC",
        length: Some(12),
        pattern: r"^[0-9]{12}$",
        message: "UPC must be exactly 12 digits",
        checksum_anchor: Some(0),
    },
    SymbologyRule {
        symbology: Symbology::Ean13,
        name: "EAN-13",
        length: Some(13),
        pattern: r"^[0-9]{13}$",
        message: "EAN-13 must be exactly 13 digits",
        checksum_anchor: Some(1),
    },
    SymbologyRule {
        symbology: Symbology::Ean8,
        name: "EAN-8",
        length: Some(8),
        pattern: r"^[0-9]{8}$",
        message: "EAN-8 must be exactly 8 digits",
        checksum_anchor: Some(0),
    },
    SymbologyRule {
        symbology: Symbology::Code128,
        name: "Code128",
        length: None,
        pattern: r"^[\x00-\x7F]+$",
        message: "Code128 must contain only ASCII characters",
        checksum_anchor: None,
    },
    SymbologyRule {
        symbology: Symbology::QrCode,
        name: "QRCode",
        length: None,
        pattern: r"^[\x00-\xFF]+$",
        message: "QR Code must contain only characters in the range U+0000 to U+00FF",
        checksum_anchor: None,
    },
    SymbologyRule {
        symbology: Symbology::Itf14,
        name: "ITF-14",
        length: Some(14),
        pattern: r"^[0-9]{14}$",
        message: "ITF-14 must be exactly 14 digits",
        checksum_anchor: None,
    },
    SymbologyRule {
        symbology: Symbology::Code39,
        name: "Code39",
        length: None,
        pattern: r"^[A-Z0-9\-.$/+% ]+$",
        message: "Code39 must contain only uppercase letters, numbers, spaces and special characters (- . $ / + %)",
        checksum_anchor: None,
    },
];

lazy_static::lazy_static! {
    static ref PATTERNS: HashMap<Symbology, Regex> = RULES
        .iter()
        .map(|rule| {
            let re = Regex::new(rule.pattern)
                .unwrap_or_else(|e| panic!("invalid pattern for {}: {}", rule.name, e));
            (rule.symbology, re)
        })
        .collect();
}

impl Symbology {
    pub const ALL: [Symbology; 7] = [
        Symbology::Upc,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Code128,
        Symbology::QrCode,
        Symbology::Itf14,
        Symbology::Code39,
    ];

    fn index(self) -> usize {
        match self {
            Symbology::Upc => 0,
            Symbology::Ean13 => 1,
            Symbology::Ean8 => 2,
            Symbology::Code128 => 3,
            Symbology::QrCode => 4,
            Symbology::Itf14 => 5,
            Symbology::Code39 => 6,
        }
    }

    pub fn rule(self) -> &'static SymbologyRule {
        &RULES[self.index()]
    }

    pub fn as_str(self) -> &'static str {
        self.rule().name
    }

    pub fn has_checksum(self) -> bool {
        self.rule().has_checksum()
    }

    /// True when `value` matches this symbology's pattern in full.
    pub fn matches(self, value: &str) -> bool {
        PATTERNS.get(&self).map(|re| re.is_match(value)).unwrap_or(false)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbology {
    type Err = UnknownSymbologyError;

    /// Accepts wire names (`EAN-13`), enum-style names (`EAN_13`, `QR_CODE`) in any
    /// case, and the legacy `Code29` spelling of Code39.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match key.as_str() {
            "UPC" => Ok(Symbology::Upc),
            "EAN13" => Ok(Symbology::Ean13),
            "EAN8" => Ok(Symbology::Ean8),
            "CODE128" => Ok(Symbology::Code128),
            "QRCODE" => Ok(Symbology::QrCode),
            "ITF14" => Ok(Symbology::Itf14),
            "CODE39" | "CODE29" => Ok(Symbology::Code39),
            _ => Err(UnknownSymbologyError { tag: s.to_string() }),
        }
    }
}
