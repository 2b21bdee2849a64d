//! # Promotion Evaluation
//!
//! Turns the promotion catalog and the current cart into a list of applied
//! promotions and one promotion discount.
//!
//! ## Evaluation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog ──► eligible? (is_active && start <= now <= end)               │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  each eligible promotion, priced against the same subtotal:             │
//! │    PERCENT_DISCOUNT  subtotal × discount / 100                          │
//! │    FIXED_DISCOUNT    min(discount, subtotal)                            │
//! │    BUY_X_GET_Y       groups × free × cheapest qualifying unit           │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  promotion_discount = min(Σ amounts, subtotal)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stacking
//! Promotions stack additively. Every amount is computed from the same
//! subtotal, so catalog order never changes the result.
//!
//! Zero-value promotions (a BUY_X_GET_Y the cart doesn't reach yet) are kept
//! in the result. Hiding them is up to whoever renders the summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLineItem;
use crate::money::Money;
use crate::pricing::{cart_subtotal, discounted_unit_price};
use crate::types::{Percentage, Promotion, PromotionType};

/// A promotion that was eligible for this evaluation, with its amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromotion {
    pub promotion_id: String,
    pub promotion_name: String,
    #[ts(type = "string")]
    pub discount_amount: Money,
}

/// Result of evaluating a promotion catalog against a cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionOutcome {
    /// Every eligible promotion, in catalog order.
    pub applied_promotions: Vec<AppliedPromotion>,
    /// Sum of the amounts, never more than the subtotal.
    pub promotion_discount: Money,
}

/// Returns the promotions of `catalog` that are eligible at `now`.
pub fn eligible_promotions(
    catalog: &[Promotion],
    now: DateTime<Utc>,
) -> impl Iterator<Item = &Promotion> {
    catalog.iter().filter(move |promo| promo.is_eligible_at(now))
}

/// Evaluates every eligible promotion against the cart.
pub fn evaluate(items: &[CartLineItem], catalog: &[Promotion], now: DateTime<Utc>) -> PromotionOutcome {
    let subtotal = cart_subtotal(items);

    let applied_promotions: Vec<AppliedPromotion> = eligible_promotions(catalog, now)
        .map(|promo| AppliedPromotion {
            promotion_id: promo.id.clone(),
            promotion_name: promo.name.clone(),
            discount_amount: promotion_amount(promo, items, subtotal),
        })
        .collect();

    let sum: Money = applied_promotions
        .iter()
        .map(|applied| applied.discount_amount)
        .sum();

    PromotionOutcome {
        applied_promotions,
        promotion_discount: sum.min(subtotal),
    }
}

/// Discount a single promotion contributes, given the cart subtotal.
///
/// Eligibility is not checked here.
pub fn promotion_amount(promo: &Promotion, items: &[CartLineItem], subtotal: Money) -> Money {
    let amount = match promo.promotion_type {
        PromotionType::PercentDiscount => {
            let pct = Percentage::from_f64_lossy(promo.discount.unwrap_or(0.0));
            subtotal.non_negative().percent_of(pct)
        }
        PromotionType::FixedDiscount => {
            let fixed = Money::from_f64_lossy(promo.discount.unwrap_or(0.0)).non_negative();
            fixed.min(subtotal.non_negative())
        }
        PromotionType::BuyXGetY => buy_x_get_y_amount(promo, items),
    };

    amount.non_negative()
}

/// `complete_groups × free_quantity × cheapest qualifying discounted unit`.
///
/// A group is `buy_quantity + free_quantity` units. The cheapest qualifying
/// unit is used so a free cup never costs the shop more than the cheapest
/// cup in the deal.
fn buy_x_get_y_amount(promo: &Promotion, items: &[CartLineItem]) -> Money {
    let buy = promo.buy_quantity.unwrap_or(0).max(0);
    let free = promo.free_quantity.unwrap_or(0).max(0);
    let group_size = buy.saturating_add(free);
    if free == 0 || group_size == 0 {
        return Money::zero();
    }

    let qualifying: Vec<&CartLineItem> = items
        .iter()
        .filter(|item| item.quantity > 0 && promo.covers_product(&item.product_id))
        .collect();

    let quantity = qualifying
        .iter()
        .fold(0i64, |total, item| total.saturating_add(item.quantity));
    let complete_groups = quantity / group_size;
    if complete_groups == 0 {
        return Money::zero();
    }

    let Some(reference_price) = qualifying
        .iter()
        .map(|item| discounted_unit_price(item))
        .min()
    else {
        return Money::zero();
    };

    reference_price * complete_groups.saturating_mul(free)
}

// =============================================================================
// Unit Tests
// =============================================================================
