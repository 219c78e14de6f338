//! Money type with precise decimal arithmetic
//!
//! The clinic bills in a single implicit currency, so `Money` is a thin
//! wrapper around `rust_decimal::Decimal`. Values are exchanged as plain
//! JSON numbers and stored as `NUMERIC`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use thiserror::Error;

/// Number of decimal places kept internally
const INTERNAL_SCALE: u32 = 4;

/// Number of decimal places used for display
const DISPLAY_SCALE: usize = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Amount out of range: {0}")]
    Overflow(String),
}

/// A monetary amount
///
/// Amounts are rounded to 4 decimal places on construction so that
/// averages and quantity products stay stable across round trips.
/// Negative amounts are allowed: a billing whose discount exceeds its
/// subtotal carries a negative total.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(INTERNAL_SCALE))
    }

    /// Creates Money from an integer amount in minor units (hundredths)
    pub fn from_minor(minor_units: i64) -> Self {
        Self::new(Decimal::new(minor_units, 2))
    }

    /// Creates a non-negative amount, rejecting negative input
    pub fn non_negative(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::InvalidAmount(format!(
                "amount must not be negative, got {}",
                amount
            )));
        }
        Ok(Self::new(amount))
    }

    /// Returns a zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Checked addition that returns an error when the result is out of range
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self::new)
            .ok_or_else(|| MoneyError::Overflow(format!("{} + {}", self.0, other.0)))
    }

    /// Checked subtraction that returns an error when the result is out of range
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Self::new)
            .ok_or_else(|| MoneyError::Overflow(format!("{} - {}", self.0, other.0)))
    }

    /// Multiplies by a whole quantity (e.g., units dispensed)
    pub fn checked_times(&self, quantity: u32) -> Result<Money, MoneyError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Self::new)
            .ok_or_else(|| MoneyError::Overflow(format!("{} x {}", self.0, quantity)))
    }

    /// Sums amounts, stopping at the first overflow
    pub fn checked_sum<I>(amounts: I) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(&amount))
    }

    /// Divides by a scalar
    pub fn divide(&self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        self.0
            .checked_div(divisor)
            .map(Self::new)
            .ok_or_else(|| MoneyError::Overflow(format!("{} / {}", self.0, divisor)))
    }

    /// Average over `count` items, zero when there are none
    pub fn average_over(&self, count: u64) -> Self {
        self.divide(Decimal::from(count)).unwrap_or_default()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.dp$}", self.0, dp = DISPLAY_SCALE)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Decimal {
        money.0
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}
