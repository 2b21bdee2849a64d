//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE INTEGER CENTS PROBLEM                                              │
//! │    $5.25 at 10% off = $4.725 per cup                                    │
//! │    Rounded per unit: 473 × 2 = $9.46, but the line is really $9.45      │
//! │                                                                         │
//! │  OUR SOLUTION: exact base-10 decimals (rust_decimal)                    │
//! │    4.725 × 2 = 9.45, rounding happens only for display                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brew_core::money::Money;
//!
//! let price = Money::from_cents(400); // $4.00
//! let shot = Money::from_cents(75);   // $0.75
//! let cup = price + shot;
//! assert_eq!((cup * 2).cents(), 950);
//!
//! // Wire input may carry NaN; it becomes zero instead of poisoning totals
//! assert!(Money::from_f64_lossy(f64::NAN).is_zero());
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::Percentage;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the store currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact for every intermediate step of cart math
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **Serialized as a string**: no precision lost on the way to the UI
/// - **Saturating ops**: `+`, `-` and `× quantity` clamp to the `Decimal`
///   range instead of panicking, since quantities have no upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Converts a wire-level float, coercing `NaN` and infinities to zero.
    ///
    /// Catalog prices and cashier input arrive as JSON numbers. A malformed
    /// value must never turn a cart total into `NaN`.
    pub fn from_f64_lossy(value: f64) -> Self {
        if !value.is_finite() {
            return Money::zero();
        }
        Money(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
    }

    /// Returns the exact amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the value in cents, rounded half away from zero.
    ///
    /// ```rust
    /// use brew_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let unit = Money::from_decimal(Decimal::new(4725, 3)); // 4.725
    /// assert_eq!(unit.cents(), 473);
    /// ```
    pub fn cents(&self) -> i64 {
        (self.round_to_cents().0 * Decimal::ONE_HUNDRED)
            .to_i64()
            .unwrap_or_default()
    }

    /// Rounds to whole cents (half away from zero) for receipts and display.
    pub fn round_to_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Floors the value at zero.
    #[inline]
    pub fn non_negative(self) -> Money {
        self.max(Money::zero())
    }

    /// Subtracts, flooring the result at zero.
    ///
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let left = Money::from_cents(300).saturating_sub(Money::from_cents(500));
    /// assert!(left.is_zero());
    /// ```
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        (self - other).non_negative()
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }

    /// Returns `percentage` of this amount.
    ///
    /// ```rust
    /// use brew_core::money::Money;
    /// use brew_core::types::Percentage;
    ///
    /// let off = Money::from_cents(2000).percent_of(Percentage::from_f64_lossy(10.0));
    /// assert_eq!(off, Money::from_cents(200));
    /// ```
    pub fn percent_of(&self, percentage: Percentage) -> Money {
        Money(self.0 * percentage.fraction())
    }

    /// Returns this amount reduced by `percentage`.
    pub fn less_percentage(&self, percentage: Percentage) -> Money {
        Money(self.0 * (Decimal::ONE - percentage.fraction()))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money rounded to cents. Use the register's currency
/// settings for anything a customer reads.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
