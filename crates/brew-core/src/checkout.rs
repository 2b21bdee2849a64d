//! # Checkout
//!
//! What the cart hands to order submission, and the checks that must pass
//! before it may.
//!
//! ## Submission Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      prepare_order(cart, catalog, options, now)         │
//! │                                                                         │
//! │  1. cart empty?                      ──► EmptyCart                      │
//! │  2. product offers sizes, no size?   ─┐                                 │
//! │     product offers sugar, no sugar?  ─┴► MissingSelections([...])       │
//! │  3. snapshot at `now`:                                                  │
//! │       OrderPayload   { payment, status, discount (manual), total }      │
//! │       OrderLinePayload per line { discounted unit price, qty, ... }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot is taken once. The caller posts it and clears the cart only
//! after every post succeeded.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartStore;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{OrderStatus, PaymentMethod, PaymentStatus};

// =============================================================================
// Product Option Catalog
// =============================================================================

/// Which selections a product offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptions {
    pub has_sizes: bool,
    pub has_sugar_levels: bool,
}

/// Source of per-product option availability.
///
/// Implemented by whatever holds the catalog; the core never fetches it.
pub trait ProductOptionCatalog {
    /// Options offered by `product_id`. Unknown products offer none.
    fn options_for(&self, product_id: &str) -> ProductOptions;
}

impl ProductOptionCatalog for HashMap<String, ProductOptions> {
    fn options_for(&self, product_id: &str) -> ProductOptions {
        self.get(product_id).copied().unwrap_or_default()
    }
}

// =============================================================================
// Missing Selections
// =============================================================================

/// A selection the order cannot be made without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RequiredSelection {
    Size,
    Sugar,
}

impl fmt::Display for RequiredSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredSelection::Size => write!(f, "size"),
            RequiredSelection::Sugar => write!(f, "sugar level"),
        }
    }
}

/// One cart line that blocks checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MissingSelection {
    pub cart_item_id: String,
    pub product_name: String,
    pub missing: Vec<RequiredSelection>,
}

impl fmt::Display for MissingSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing = self
            .missing
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} ({})", self.product_name, missing)
    }
}

/// Lines whose product offers sizes or sugar levels the line has not picked.
pub fn missing_selections(
    cart: &CartStore,
    catalog: &impl ProductOptionCatalog,
) -> Vec<MissingSelection> {
    cart.items()
        .iter()
        .filter_map(|item| {
            let options = catalog.options_for(&item.product_id);
            let mut missing = Vec::new();
            if options.has_sizes && item.size.is_none() {
                missing.push(RequiredSelection::Size);
            }
            if options.has_sugar_levels && item.sugar.is_none() {
                missing.push(RequiredSelection::Sugar);
            }

            (!missing.is_empty()).then(|| MissingSelection {
                cart_item_id: item.cart_item_id.clone(),
                product_name: item.name.clone(),
                missing,
            })
        })
        .collect()
}

/// Checks that the cart may be submitted.
///
/// ## Errors
/// - `EmptyCart` if there are no lines
/// - `MissingSelections` listing every blocking line
pub fn validate_checkout(cart: &CartStore, catalog: &impl ProductOptionCatalog) -> CoreResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let missing = missing_selections(cart, catalog);
    if !missing.is_empty() {
        return Err(CoreError::MissingSelections(missing));
    }

    Ok(())
}

// =============================================================================
// Order Payloads
// =============================================================================

/// Payment and workflow status for a new order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOptions {
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
}

/// The order header sent to the order API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    /// Manual discount only; product discounts and promotions are already
    /// inside `total`.
    #[ts(type = "string")]
    pub discount: Money,
    #[ts(type = "string")]
    pub total: Money,
    pub note: Option<String>,
}

/// One line item sent to the order API after the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    pub product_id: String,
    /// Unit price after the product discount.
    #[ts(type = "string")]
    pub price: Money,
    pub quantity: i64,
    pub size_id: Option<String>,
    pub sugar_id: Option<String>,
    pub ice_id: Option<String>,
    pub extra_shot_id: Option<String>,
    pub note: Option<String>,
}

/// A validated snapshot of the cart, ready to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub order: OrderPayload,
    pub lines: Vec<OrderLinePayload>,
}

/// Validates the cart and snapshots it for submission at `now`.
pub fn prepare_order(
    cart: &CartStore,
    catalog: &impl ProductOptionCatalog,
    options: CheckoutOptions,
    now: DateTime<Utc>,
) -> CoreResult<OrderSubmission> {
    validate_checkout(cart, catalog)?;

    let totals = cart.totals_at(now);
    let note = cart.note().trim();

    let order = OrderPayload {
        payment_method: options.payment_method,
        payment_status: options.payment_status,
        order_status: options.order_status,
        discount: totals.discount_amount,
        total: totals.total,
        note: (!note.is_empty()).then(|| note.to_string()),
    };

    let lines = cart
        .items()
        .iter()
        .map(|item| OrderLinePayload {
            product_id: item.product_id.clone(),
            price: item.discounted_unit_price(),
            quantity: item.quantity,
            size_id: item.size.as_ref().map(|s| s.id.clone()),
            sugar_id: item.sugar.as_ref().map(|s| s.id.clone()),
            ice_id: item.ice.as_ref().map(|i| i.id.clone()),
            extra_shot_id: item.extra_shot.as_ref().map(|s| s.id.clone()),
            note: item.note.clone(),
        })
        .collect();

    Ok(OrderSubmission { order, lines })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Customization;
    use crate::discount::{DiscountKind, ManualDiscount};
    use crate::types::{Choice, PricedOption, Product};

    fn product(id: &str, name: &str, price: f64, discount: f64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            image: None,
            price,
            discount,
        }
    }

    fn catalog() -> HashMap<String, ProductOptions> {
        HashMap::from([
            (
                "latte".to_string(),
                ProductOptions {
                    has_sizes: true,
                    has_sugar_levels: true,
                },
            ),
            (
                "espresso".to_string(),
                ProductOptions {
                    has_sizes: false,
                    has_sugar_levels: true,
                },
            ),
        ])
    }

    #[test]
    fn test_empty_cart_is_blocked() {
        let cart = CartStore::new();
        assert!(matches!(
            validate_checkout(&cart, &catalog()),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_scenario_missing_size_blocks_submission() {
        let mut cart = CartStore::new();
        cart.add_item(
            &product("latte", "Latte", 4.5, 0.0),
            Some(Customization {
                sugar: Some(Choice::new("s50", "50%")),
                ..Default::default()
            }),
        )
        .unwrap();

        let err = prepare_order(&cart, &catalog(), CheckoutOptions::default(), Utc::now())
            .unwrap_err();
        match &err {
            CoreError::MissingSelections(missing) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].product_name, "Latte");
                assert_eq!(missing[0].missing, vec![RequiredSelection::Size]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Latte (size)"));
    }

    #[test]
    fn test_every_blocking_line_is_listed() {
        let mut cart = CartStore::new();
        cart.add_item(&product("latte", "Latte", 4.5, 0.0), None).unwrap();
        cart.add_item(&product("espresso", "Espresso", 2.5, 0.0), None).unwrap();
        cart.add_item(&product("scone", "Scone", 3.0, 0.0), None).unwrap();

        let missing = missing_selections(&cart, &catalog());
        assert_eq!(missing.len(), 2);
        assert_eq!(
            missing[0].missing,
            vec![RequiredSelection::Size, RequiredSelection::Sugar]
        );
        assert_eq!(missing[1].product_name, "Espresso");
        assert_eq!(missing[1].missing, vec![RequiredSelection::Sugar]);
    }

    #[test]
    fn test_unknown_product_offers_nothing() {
        let options = catalog().options_for("cookie");
        assert_eq!(options, ProductOptions::default());
    }

    #[test]
    fn test_prepare_order_snapshots_totals_and_lines() {
        let mut cart = CartStore::new();
        cart.add_item(
            &product("latte", "Latte", 4.0, 10.0),
            Some(Customization {
                size: Some(PricedOption::new("L", "Large", 0.5)),
                sugar: Some(Choice::new("s0", "No sugar")),
                extra_shot: Some(PricedOption::new("shot", "Extra shot", 0.75)),
                note: Some("extra hot".to_string()),
                quantity: Some(2),
                ..Default::default()
            }),
        )
        .unwrap();
        cart.set_discount(ManualDiscount::new(DiscountKind::Amount, 0.45));
        cart.set_note("  table 3 ").unwrap();

        let options = CheckoutOptions {
            payment_method: PaymentMethod::Card,
            ..Default::default()
        };
        let submission = prepare_order(&cart, &catalog(), options, Utc::now()).unwrap();

        assert_eq!(submission.order.payment_method, PaymentMethod::Card);
        assert_eq!(submission.order.payment_status, PaymentStatus::Paid);
        assert_eq!(submission.order.order_status, OrderStatus::Pending);
        assert_eq!(submission.order.discount, Money::from_cents(45));
        assert_eq!(submission.order.total, Money::from_cents(900));
        assert_eq!(submission.order.note.as_deref(), Some("table 3"));

        assert_eq!(submission.lines.len(), 1);
        let line = &submission.lines[0];
        assert_eq!(line.price, cart.items()[0].discounted_unit_price());
        assert_eq!(line.quantity, 2);
        assert_eq!(line.size_id.as_deref(), Some("L"));
        assert_eq!(line.sugar_id.as_deref(), Some("s0"));
        assert_eq!(line.ice_id, None);
        assert_eq!(line.extra_shot_id.as_deref(), Some("shot"));
        assert_eq!(line.note.as_deref(), Some("extra hot"));
    }

    #[test]
    fn test_prepare_order_leaves_cart_untouched() {
        let mut cart = CartStore::new();
        cart.add_item(&product("scone", "Scone", 3.0, 0.0), None).unwrap();

        prepare_order(&cart, &catalog(), CheckoutOptions::default(), Utc::now()).unwrap();
        assert_eq!(cart.item_count(), 1);
    }
}
