//! # Manual Discount
//!
//! The single cashier-entered discount, applied after promotions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal $20.00 ── promotions −$3.00 ──► base $17.00                   │
//! │                                                                         │
//! │  percent 10   → 17.00 × 10 / 100      = $1.70                           │
//! │  amount 500   → min(500, 17.00)       = $17.00                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raw Input vs. Range
//! Text that is not a finite, non-negative number is rejected
//! ([`ManualDiscount::parse`]). A number that is merely out of range is
//! clamped: percent to `0..=100`, amount to what is left after promotions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percentage;
use crate::validation::{parse_discount_value, ValidationResult};

/// Whether a manual discount is a percentage or a fixed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    Percent,
    Amount,
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountKind::Percent => write!(f, "percent"),
            DiscountKind::Amount => write!(f, "amount"),
        }
    }
}

impl FromStr for DiscountKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percent" | "%" => Ok(DiscountKind::Percent),
            "amount" | "fixed" => Ok(DiscountKind::Amount),
            _ => Err(ValidationError::NotAllowed {
                field: "discount type".to_string(),
                allowed: vec!["percent".to_string(), "amount".to_string()],
            }),
        }
    }
}

/// The cashier's manual discount. At most one is active on a cart.
///
/// Serialized as `{ "type": "percent", "value": "10" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ManualDiscount {
    Percent(Percentage),
    Amount(Money),
}

impl ManualDiscount {
    /// Builds a discount from a numeric value, clamping it into range.
    ///
    /// ```rust
    /// use brew_core::discount::{DiscountKind, ManualDiscount};
    /// use brew_core::money::Money;
    ///
    /// let d = ManualDiscount::new(DiscountKind::Amount, -4.0);
    /// assert_eq!(d, ManualDiscount::Amount(Money::zero()));
    /// ```
    pub fn new(kind: DiscountKind, value: f64) -> Self {
        match kind {
            DiscountKind::Percent => ManualDiscount::Percent(Percentage::from_f64_lossy(value)),
            DiscountKind::Amount => {
                ManualDiscount::Amount(Money::from_f64_lossy(value).non_negative())
            }
        }
    }

    /// Parses raw cashier input, rejecting text that is not a number.
    pub fn parse(kind: DiscountKind, raw: &str) -> ValidationResult<Self> {
        let value = parse_discount_value(raw)?;
        Ok(ManualDiscount::new(kind, value))
    }

    /// Returns which kind of discount this is.
    pub fn kind(&self) -> DiscountKind {
        match self {
            ManualDiscount::Percent(_) => DiscountKind::Percent,
            ManualDiscount::Amount(_) => DiscountKind::Amount,
        }
    }

    /// Discount amount against `base` (subtotal minus promotions).
    ///
    /// Never negative, never more than `base`.
    pub fn amount_against(&self, base: Money) -> Money {
        let base = base.non_negative();
        let amount = match self {
            ManualDiscount::Percent(pct) => base.percent_of(*pct),
            ManualDiscount::Amount(value) => value.non_negative().min(base),
        };
        amount.non_negative()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
