//! Phone number type used as a login identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is empty after trimming.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character other than digits, separators or a leading `+`.
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// Too few or too many digits.
    #[error("phone number must have between {min} and {max} digits (got {got})")]
    Length {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
        /// Digits found.
        got: usize,
    },
}

/// A normalized phone number.
///
/// Spaces, dashes, dots and parentheses are dropped; a leading `+` is kept.
/// The remaining digits must number between 7 and 15 (E.164 upper bound).
///
/// ```
/// use bozor_core::Phone;
///
/// let phone = Phone::parse("+998 (90) 123-45-67").unwrap();
/// assert_eq!(phone.as_str(), "+998901234567");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse and normalize a `Phone`.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] if the input is empty, contains letters or
    /// other symbols, or has the wrong number of digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let (plus, rest) = s.strip_prefix('+').map_or((false, s), |rest| (true, rest));
        let mut normalized = String::with_capacity(s.len());
        if plus {
            normalized.push('+');
        }

        let mut digits = 0;
        for c in rest.chars() {
            match c {
                '0'..='9' => {
                    normalized.push(c);
                    digits += 1;
                }
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneError::Length {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                got: digits,
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_are_dropped() {
        assert_eq!(Phone::parse("90 123 45 67").unwrap().as_str(), "901234567");
    }

    #[test]
    fn test_plus_only_allowed_in_front() {
        assert_eq!(
            Phone::parse("998+901234567"),
            Err(PhoneError::InvalidCharacter('+'))
        );
    }

    #[test]
    fn test_letters_rejected() {
        assert_eq!(
            Phone::parse("call-me-maybe"),
            Err(PhoneError::InvalidCharacter('c'))
        );
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            Phone::parse("12345"),
            Err(PhoneError::Length { got: 5, .. })
        ));
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::Length { got: 16, .. })
        ));
        assert!(Phone::parse("1234567").is_ok());
    }

    #[test]
    fn test_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
    }
}
