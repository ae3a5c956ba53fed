//! Recipe price parsing and formatting.
//!
//! Prices are fixed-point decimals with at most 5 digits, at most 2 of them
//! after the decimal point, and are always rendered with exactly 2 places.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidationError;

pub const MAX_DIGITS: u32 = 5;
pub const DECIMAL_PLACES: u32 = 2;

/// Raw price text as submitted; accepts a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceInput(pub String);

impl<'de> Deserialize<'de> for PriceInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => PriceInput(s.trim().to_string()),
            // Number's Display is the shortest exact form (5.25, not 5.2499...)
            Raw::Number(n) => PriceInput(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    Invalid,
    MaxDigits,
    MaxDecimalPlaces,
    MaxWholeDigits,
}

impl PriceError {
    pub fn message(&self) -> &'static str {
        match self {
            PriceError::Invalid => "A valid number is required.",
            PriceError::MaxDigits => "Ensure that there are no more than 5 digits in total.",
            PriceError::MaxDecimalPlaces => {
                "Ensure that there are no more than 2 decimal places."
            }
            PriceError::MaxWholeDigits => {
                "Ensure that there are no more than 3 digits before the decimal point."
            }
        }
    }
}

impl fmt::Display for PriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

fn digit_count(mantissa: i128) -> u32 {
    match mantissa.unsigned_abs().checked_ilog10() {
        Some(n) => n + 1,
        None => 1,
    }
}

/// Parse and range-check a price; the result always has scale 2.
pub fn parse_price(raw: &str) -> Result<Decimal, PriceError> {
    let value = Decimal::from_str(raw).map_err(|_| PriceError::Invalid)?;

    let scale = value.scale();
    let digits = digit_count(value.mantissa());
    let (total, whole) = if digits > scale {
        (digits, digits - scale)
    } else {
        (scale, 0)
    };

    if total > MAX_DIGITS {
        return Err(PriceError::MaxDigits);
    }
    if scale > DECIMAL_PLACES {
        return Err(PriceError::MaxDecimalPlaces);
    }
    if whole > MAX_DIGITS - DECIMAL_PLACES {
        return Err(PriceError::MaxWholeDigits);
    }

    let mut value = value;
    value.rescale(DECIMAL_PLACES);
    Ok(value)
}

/// `validator` hook for price fields.
pub fn validate_price(input: &PriceInput) -> Result<(), ValidationError> {
    parse_price(&input.0)
        .map(|_| ())
        .map_err(|e| ValidationError::new("price").with_message(Cow::Borrowed(e.message())))
}

/// Render a price with exactly two decimal places.
pub fn format_price(price: Decimal) -> String {
    let mut price = price;
    price.rescale(DECIMAL_PLACES);
    price.to_string()
}
