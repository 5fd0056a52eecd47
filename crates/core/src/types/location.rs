//! Shipping zone location codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`LocationCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The input string is empty.
    #[error("location code cannot be empty")]
    Empty,
    /// The input contains characters WooCommerce never uses in codes.
    #[error("location code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A shipping zone location code.
///
/// WooCommerce uses ISO 3166-1 alpha-2 country codes (`CN`), country/state
/// pairs (`US:CA`) and continent codes (`AS`). Codes are normalised to
/// uppercase.
///
/// ## Examples
///
/// ```
/// use woo_e2e_core::LocationCode;
///
/// assert_eq!(LocationCode::parse("cn").unwrap().as_str(), "CN");
/// assert!(LocationCode::parse("US:CA").is_ok());
/// assert!(LocationCode::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct LocationCode(String);

impl LocationCode {
    /// Parse a location code.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains characters other
    /// than ASCII letters, digits, `:` and `-`.
    pub fn parse(s: &str) -> Result<Self, LocationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LocationError::Empty);
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == ':' || *c == '-'))
        {
            return Err(LocationError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for LocationCode {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
