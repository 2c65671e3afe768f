//! Promo code syntax.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PromoCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PromoCodeError {
    #[error("promo code cannot be empty")]
    Empty,
    #[error("promo code must be at least {min} characters")]
    TooShort { min: usize },
    #[error("promo code must be at most {max} characters")]
    TooLong { max: usize },
    #[error("promo code cannot contain '{0}'")]
    InvalidCharacter(char),
}

/// A normalised promo code.
///
/// Shoppers type codes in any case and with stray whitespace; the stored and
/// compared form is trimmed and ASCII upper-cased, made of `A-Z`, `0-9`, `-`
/// and `_`.
///
/// ```
/// use giftly_core::promo::PromoCode;
///
/// let code = PromoCode::parse("  spring-25 ").unwrap();
/// assert_eq!(code.as_str(), "SPRING-25");
/// assert!(PromoCode::parse("10% OFF").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromoCode(String);

impl PromoCode {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 32;

    /// Parse and normalise a promo code.
    ///
    /// # Errors
    ///
    /// Returns a [`PromoCodeError`] if the code is empty, has the wrong length
    /// or contains characters outside `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, PromoCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PromoCodeError::Empty);
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(PromoCodeError::InvalidCharacter(c));
        }
        // ASCII-only from here, so byte length equals char count
        if trimmed.len() < Self::MIN_LENGTH {
            return Err(PromoCodeError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(PromoCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PromoCode {
    type Error = PromoCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PromoCode> for String {
    fn from(code: PromoCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for PromoCode {
    type Err = PromoCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
