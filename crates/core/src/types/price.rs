//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative amount in the store currency.
///
/// Serialized as a decimal string to preserve precision; deserializes from
/// either a string or a JSON number and rejects negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest representable price. Arithmetic saturates here.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u64) -> Self {
        Self(Decimal::from(cents) / Decimal::ONE_HUNDRED)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price, saturating at [`Price::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map_or(Self::MAX, Self)
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

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at [`Price::MAX`].
    fn add(self, rhs: Self) -> Self {
        self.0.checked_add(rhs.0).map_or(Self::MAX, Self)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("${:.2}", self.0.round_dp(2)))
    }
}
