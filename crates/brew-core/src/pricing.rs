//! # Line Item Pricing
//!
//! Per-unit and per-line prices for a cart line. Pure functions of the line,
//! nothing else.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Latte $4.00 · Large +$0.50 · Extra shot +$0.75 · 10% off · qty 2      │
//! │                                                                         │
//! │  unit_price            = 4.00 + 0.50 + 0.75      = 5.25                │
//! │  discounted_unit_price = 5.25 × (1 - 10/100)     = 4.725               │
//! │  line_total            = 4.725 × 2               = 9.45                │
//! │  line_subtotal         = 5.25 × 2                = 10.50               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::cart::CartLineItem;
use crate::money::Money;

/// Unit price before the product discount: base price plus size and
/// extra-shot modifiers.
pub fn unit_price(item: &CartLineItem) -> Money {
    let size = item
        .size
        .as_ref()
        .map_or(Money::zero(), |size| size.price_modifier);
    let shot = item
        .extra_shot
        .as_ref()
        .map_or(Money::zero(), |shot| shot.price_modifier);

    item.base_price + size + shot
}

/// Unit price after the product's own percentage discount.
pub fn discounted_unit_price(item: &CartLineItem) -> Money {
    unit_price(item).less_percentage(item.discount)
}

/// Line total after the product discount.
pub fn line_total(item: &CartLineItem) -> Money {
    discounted_unit_price(item) * item.quantity.max(0)
}

/// Line total before the product discount.
pub fn line_subtotal(item: &CartLineItem) -> Money {
    unit_price(item) * item.quantity.max(0)
}

/// Sum of [`line_total`] over every line: the sticker subtotal.
pub fn cart_subtotal(items: &[CartLineItem]) -> Money {
    items.iter().map(line_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
