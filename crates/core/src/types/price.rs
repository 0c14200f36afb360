//! Regular price as WooCommerce represents it: a decimal amount carried as a string.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RegularPrice`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty or whitespace.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("'{0}' is not a decimal amount")]
    Invalid(String),
    /// The amount is zero.
    #[error("price must be greater than zero")]
    Zero,
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A product's base price.
///
/// WooCommerce stores prices as strings in the store currency (no currency
/// code on the product itself). The original text is kept so the value is
/// forwarded upstream exactly as entered; the parsed [`Decimal`] is used for
/// validation and display.
///
/// ## Constraints
///
/// - Must be non-empty after trimming
/// - Must be plain decimal notation: optional sign, digits, optional
///   fractional part (no exponent, no digit separators)
/// - Must be strictly positive
///
/// ## Examples
///
/// ```
/// use mini_product_manager_core::RegularPrice;
///
/// assert!(RegularPrice::parse("9.99").is_ok());
/// assert!(RegularPrice::parse("").is_err());
/// assert!(RegularPrice::parse("0").is_err());
/// assert!(RegularPrice::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegularPrice {
    text: String,
    amount: Decimal,
}

impl RegularPrice {
    /// Parse a `RegularPrice` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not a decimal number, or is
    /// not greater than zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let text = s.trim();
        if text.is_empty() {
            return Err(PriceError::Empty);
        }

        if !is_plain_decimal(text) {
            return Err(PriceError::Invalid(text.to_owned()));
        }
        let amount =
            Decimal::from_str(text).map_err(|_| PriceError::Invalid(text.to_owned()))?;

        if amount.is_zero() {
            return Err(PriceError::Zero);
        }
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }

        Ok(Self {
            text: text.to_owned(),
            amount,
        })
    }

    /// Returns the price exactly as it will be sent to WooCommerce.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the parsed amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Format for display with two decimal places (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.amount)
    }
}

/// `[+-]?digits(.digits)?`
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

impl fmt::Display for RegularPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for RegularPrice {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegularPrice {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegularPrice> for String {
    fn from(price: RegularPrice) -> Self {
        price.text
    }
}

impl AsRef<str> for RegularPrice {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert_eq!(RegularPrice::parse("9.99").unwrap().as_str(), "9.99");
        assert_eq!(RegularPrice::parse("10").unwrap().as_str(), "10");
        assert_eq!(RegularPrice::parse("0.01").unwrap().as_str(), "0.01");
    }

    #[test]
    fn test_parse_keeps_text_but_trims_whitespace() {
        let price = RegularPrice::parse("  5.00 ").unwrap();
        assert_eq!(price.as_str(), "5.00");
        assert_eq!(price.amount(), Decimal::new(500, 2));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(RegularPrice::parse(""), Err(PriceError::Empty));
        assert_eq!(RegularPrice::parse("   "), Err(PriceError::Empty));
    }

    #[test]
    fn test_parse_zero_and_negative() {
        assert_eq!(RegularPrice::parse("0"), Err(PriceError::Zero));
        assert_eq!(RegularPrice::parse("0.00"), Err(PriceError::Zero));
        assert_eq!(RegularPrice::parse("-3.50"), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_not_a_number() {
        for bad in ["twelve", "1_000", "9_.9_9", "1e3", "1.2.3", ".5", "5.", "+", "0x10"] {
            assert!(
                matches!(RegularPrice::parse(bad), Err(PriceError::Invalid(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_parse_accepts_explicit_plus_sign() {
        assert_eq!(RegularPrice::parse("+5").unwrap().amount(), Decimal::new(5, 0));
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(RegularPrice::parse("7").unwrap().display(), "$7.00");
        assert_eq!(RegularPrice::parse("19.9").unwrap().display(), "$19.90");
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let price = RegularPrice::parse("12.50").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"12.50\"");

        let parsed: RegularPrice = serde_json::from_str("\"3.25\"").unwrap();
        assert_eq!(parsed.as_str(), "3.25");

        assert!(serde_json::from_str::<RegularPrice>("\"0\"").is_err());
    }
}
