//! Address text handling for the shell around the engine.
//!
//! Engines only ever see `u64` addresses; everything here runs before that.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radix {
    #[default]
    #[serde(alias = "dec")]
    Decimal,
    #[serde(alias = "hexadecimal")]
    Hex,
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Radix::Decimal => f.write_str("decimal"),
            Radix::Hex => f.write_str("hexadecimal"),
        }
    }
}

/// Parses one address token.
///
/// Decimal input must be plain ASCII digits. Hex input may carry a single
/// `0x` prefix. Surrounding whitespace is ignored in both modes.
pub fn parse_address(text: &str, radix: Radix) -> Result<u64, AddressError> {
    let invalid = || AddressError::InvalidAddressText {
        text: text.to_string(),
        radix,
    };

    let trimmed = text.trim();
    let (digits, base) = match radix {
        Radix::Decimal => {
            if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            (trimmed, 10)
        }
        Radix::Hex => {
            let digits = trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
                .unwrap_or(trimmed);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            (digits, 16)
        }
    };
    u64::from_str_radix(digits, base).map_err(|_| invalid())
}

pub fn format_address(addr: u64, radix: Radix) -> String {
    match radix {
        Radix::Decimal => addr.to_string(),
        Radix::Hex => format!("0x{addr:X}"),
    }
}
