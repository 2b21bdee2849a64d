//! # Domain Types
//!
//! Core domain types shared by the cart, the promotion evaluator and the
//! checkout contract.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Promotion     │   │  PricedOption   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  type           │   │  size / shot    │       │
//! │  │  price (wire)   │   │  window         │   │  price_modifier │       │
//! │  │  discount %     │   │  is_active      │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Percentage    │   │     Choice      │   │ PaymentMethod   │       │
//! │  │  0..=100        │   │  sugar / ice    │   │ PaymentStatus   │       │
//! │  │  NaN → 0        │   │  id + label     │   │ OrderStatus     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Rule
//! A `Product` is read once, when it is added to the cart. Its price and
//! discount are copied onto the cart line, so later catalog edits never
//! change a sale already in progress.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage clamped to `0..=100`.
///
/// Used for product-level discounts, percent promotions and percent manual
/// discounts. Construction never fails: out-of-range values are clamped and
/// non-finite floats become zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);

    /// Creates a percentage from a decimal, clamping to `0..=100`.
    pub fn from_decimal(value: Decimal) -> Self {
        Percentage(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// Creates a percentage from a wire-level float.
    ///
    /// ```rust
    /// use brew_core::types::Percentage;
    ///
    /// assert_eq!(Percentage::from_f64_lossy(150.0), Percentage::from_f64_lossy(100.0));
    /// assert_eq!(Percentage::from_f64_lossy(f64::NAN), Percentage::ZERO);
    /// ```
    pub fn from_f64_lossy(value: f64) -> Self {
        if !value.is_finite() {
            return Percentage::ZERO;
        }
        Percentage::from_decimal(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
    }

    /// Returns the percentage value (10 for 10%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the fraction (0.1 for 10%).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::ZERO
    }
}

impl From<Decimal> for Percentage {
    fn from(value: Decimal) -> Self {
        Percentage::from_decimal(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product as delivered by the catalog API.
///
/// Prices are JSON numbers on the wire, hence `f64`. They go through
/// [`Money::from_f64_lossy`] before touching any cart math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Image URL for the cart panel.
    #[serde(default)]
    pub image: Option<String>,

    /// List price.
    pub price: f64,

    /// Product-level discount in percent (0-100).
    #[serde(default)]
    pub discount: f64,
}

impl Product {
    /// Returns the list price as Money (`NaN` becomes zero).
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_f64_lossy(self.price).non_negative()
    }

    /// Returns the product discount, clamped to `0..=100`.
    #[inline]
    pub fn discount(&self) -> Percentage {
        Percentage::from_f64_lossy(self.discount)
    }
}

// =============================================================================
// Customization Options
// =============================================================================

/// An option that changes the price of a cup: a size or an extra shot.
///
/// Modifiers are store-configured, never typed in by the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedOption {
    pub id: String,
    pub name: String,
    #[ts(type = "string")]
    pub price_modifier: Money,
}

impl PricedOption {
    /// Creates an option from a wire-level modifier.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_modifier: f64) -> Self {
        PricedOption {
            id: id.into(),
            name: name.into(),
            price_modifier: Money::from_f64_lossy(price_modifier),
        }
    }
}

/// A price-neutral choice: a sugar level or an ice level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    pub label: String,
}

impl Choice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Choice {
            id: id.into(),
            label: label.into(),
        }
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// The kind of rule a promotion applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionType {
    /// Buy `buy_quantity`, get `free_quantity` free.
    BuyXGetY,
    /// Percent off the cart subtotal.
    PercentDiscount,
    /// Fixed amount off the cart subtotal.
    FixedDiscount,
}

/// A store-wide promotion from the promotion catalog.
///
/// Read-only from the cart's point of view; the catalog is injected with
/// `CartStore::set_promotions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub promotion_type: PromotionType,

    /// Units that must be bought per group (BUY_X_GET_Y).
    #[serde(default)]
    pub buy_quantity: Option<i64>,

    /// Units given free per group (BUY_X_GET_Y).
    #[serde(default)]
    pub free_quantity: Option<i64>,

    /// Percent (PERCENT_DISCOUNT) or amount (FIXED_DISCOUNT).
    #[serde(default)]
    pub discount: Option<f64>,

    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,

    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,

    pub is_active: bool,

    /// Products counted by a BUY_X_GET_Y promotion. Empty means every product.
    #[serde(default)]
    pub product_ids: Vec<String>,
}

impl Promotion {
    /// A promotion is eligible when active and `start_date <= now <= end_date`.
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }

    /// Whether units of `product_id` count towards this promotion.
    pub fn covers_product(&self, product_id: &str) -> bool {
        self.product_ids.is_empty() || self.product_ids.iter().any(|id| id == product_id)
    }
}

// =============================================================================
// Order Status Types
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    BankTransfer,
}

/// Whether the order has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    #[default]
    Paid,
}

/// Where the order is in the bar's workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

// =============================================================================
// Unit Tests
// =============================================================================
