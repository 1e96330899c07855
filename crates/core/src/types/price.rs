//! Non-negative, currency-agnostic unit price using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A unit price.
///
/// The store never interprets currency; a price is just a non-negative
/// decimal amount. Negative amounts are rejected both when constructing and
/// when deserializing, so a persisted cart with a negative price is treated as
/// malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }

    /// Apply a percentage discount, rounded to two decimal places.
    ///
    /// Percentages are clamped to `0..=100` so the result stays non-negative.
    ///
    /// ```
    /// use bozor_core::Price;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Price::new(Decimal::new(10000, 2)).unwrap();
    /// let sale = price.discounted(Decimal::new(125, 1));
    /// assert_eq!(sale.amount(), Decimal::new(8750, 2));
    /// ```
    #[must_use]
    pub fn discounted(&self, percent: Decimal) -> Self {
        let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        // The kept share is in 0..=1, so the product never exceeds the price.
        let kept = (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED;
        let reduced = self.0.saturating_mul(kept);
        Self(reduced.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 0)),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_accepts_zero() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_times() {
        let price = Price::new(Decimal::new(250, 2)).unwrap();
        assert_eq!(price.times(4), Decimal::new(1000, 2));
    }

    #[test]
    fn test_times_saturates_at_max() {
        let price = Price::new(Decimal::from_i128_with_scale(10_i128.pow(20), 0)).unwrap();
        assert_eq!(price.times(u32::MAX), Decimal::MAX);

        let top = Price::new(Decimal::MAX).unwrap();
        assert_eq!(top.times(u32::MAX), Decimal::MAX);
        assert_eq!(top.times(1), Decimal::MAX);
        assert_eq!(top.times(0), Decimal::ZERO);
    }

    #[test]
    fn test_discount_on_largest_price() {
        let top = Price::new(Decimal::MAX).unwrap();
        assert_eq!(top.discounted(Decimal::ZERO), top);
        assert_eq!(top.discounted(Decimal::ONE_HUNDRED), Price::ZERO);
        let half = top.discounted(Decimal::from(50));
        assert!(half < top);
        assert!(half > Price::ZERO);
    }

    #[test]
    fn test_discount_is_clamped() {
        let price = Price::new(Decimal::from(80)).unwrap();
        assert_eq!(price.discounted(Decimal::from(150)), Price::ZERO);
        assert_eq!(price.discounted(Decimal::from(-5)), price);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-3.50\"").is_err());
        assert!(serde_json::from_str::<Price>("-3.5").is_err());
    }

    #[test]
    fn test_deserialize_accepts_number_and_string() {
        let from_number: Price = serde_json::from_str("9.99").unwrap();
        let from_string: Price = serde_json::from_str("\"9.99\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_display_two_places() {
        let price = Price::new(Decimal::from(5)).unwrap();
        assert_eq!(price.to_string(), "5.00");
    }
}
