//! Type-safe price representation using decimal arithmetic.
//!
//! WooCommerce stores prices as decimal strings (`"9.99"`), and the storefront
//! renders them with currency symbols and separators around that same string.
//! [`Price`] keeps the decimal value together with the exact text entered into
//! the admin form, so assertions against rendered prices compare the literal
//! fixture string rather than a re-formatted number.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price is not a decimal number: {0}")]
    NotDecimal(String),
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A regular price as typed into the product editor.
///
/// ## Examples
///
/// ```
/// use woo_e2e_core::Price;
///
/// let price = Price::parse("9.99").unwrap();
/// assert_eq!(price.as_str(), "9.99");
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    amount: Decimal,
    raw: String,
}

impl Price {
    /// Parse a price from its decimal string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a decimal, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(raw).map_err(|_| PriceError::NotDecimal(raw.to_owned()))?;
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }

        Ok(Self {
            amount,
            raw: raw.to_owned(),
        })
    }

    /// Create a price from an amount in cents (e.g. `999` for `"9.99"`).
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        let amount = Decimal::new(i64::from(cents), 2);
        Self {
            amount,
            raw: amount.to_string(),
        }
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The exact string entered into the admin form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Price {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.raw
    }
}
