//! # Cart Commands
//!
//! Commands the cashier UI sends to change the cart. Every command returns
//! the whole cart with totals recomputed at the moment of the call.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │          │     │ created  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                             │             │
//! │       │           update_*, toggle_extra_shot             │             │
//! │       │           set_discount, set_order_note            │             │
//! │       │                │                                  │             │
//! │       │                ▼                                  │             │
//! │       └──────── clear_cart ◄───────── submit_order ◄──────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use brew_core::cart::{CartLineItem, CommandOutcome, Customization, ExtraShotToggle};
use brew_core::discount::{DiscountKind, ManualDiscount};
use brew_core::promotions::AppliedPromotion;
use brew_core::{CartCommand, CartStore, CartTotals, Choice, PricedOption, Product, Promotion};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::CartState;

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub totals: CartTotals,

    /// Applied promotions with a non-zero amount, for the summary panel.
    pub visible_promotions: Vec<AppliedPromotion>,

    pub discount: Option<ManualDiscount>,
    pub note: String,

    /// Line created or incremented by `add_to_cart`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_item_id: Option<String>,

    /// What `toggle_extra_shot` did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_shot: Option<ExtraShotToggle>,
}

impl CartResponse {
    /// Snapshots the cart with totals evaluated at `now`.
    pub fn at(cart: &CartStore, now: DateTime<Utc>) -> Self {
        let totals = cart.totals_at(now);
        let visible_promotions = totals.visible_promotions().cloned().collect();

        CartResponse {
            items: cart.items().to_vec(),
            totals,
            visible_promotions,
            discount: cart.discount().copied(),
            note: cart.note().to_string(),
            added_item_id: None,
            extra_shot: None,
        }
    }

    fn with_outcome(mut self, outcome: CommandOutcome) -> Self {
        match outcome {
            CommandOutcome::Added { cart_item_id } => self.added_item_id = Some(cart_item_id),
            CommandOutcome::ExtraShot(toggle) => self.extra_shot = Some(toggle),
            CommandOutcome::Done => {}
        }
        self
    }
}

impl From<&CartStore> for CartResponse {
    fn from(cart: &CartStore) -> Self {
        CartResponse::at(cart, Utc::now())
    }
}

fn action_name(command: &CartCommand) -> &'static str {
    match command {
        CartCommand::AddItem { .. } => "add_item",
        CartCommand::RemoveItem { .. } => "remove_item",
        CartCommand::UpdateQuantity { .. } => "update_quantity",
        CartCommand::UpdateSize { .. } => "update_size",
        CartCommand::UpdateSugar { .. } => "update_sugar",
        CartCommand::UpdateIce { .. } => "update_ice",
        CartCommand::ToggleExtraShot { .. } => "toggle_extra_shot",
        CartCommand::UpdateNote { .. } => "update_note",
        CartCommand::SetDiscount { .. } => "set_discount",
        CartCommand::RemoveDiscount => "remove_discount",
        CartCommand::SetNote { .. } => "set_note",
        CartCommand::RemoveNote => "remove_note",
        CartCommand::SetPromotions { .. } => "set_promotions",
        CartCommand::RemoveAll => "remove_all",
    }
}

/// Applies any [`CartCommand`] and returns the updated cart.
///
/// Every named command below goes through here, so this is the single
/// place cart mutations are logged.
pub fn apply_cart_command(
    cart: &CartState,
    command: CartCommand,
) -> Result<CartResponse, ApiError> {
    let action = action_name(&command);
    debug!(action, "cart command");

    let result = cart.with_cart_mut(|c| {
        let outcome = c.apply(command)?;
        Ok::<CartResponse, ApiError>(CartResponse::from(&*c).with_outcome(outcome))
    });

    match &result {
        Ok(response) => debug!(
            action,
            items = response.totals.item_count,
            subtotal = %response.totals.subtotal,
            total = %response.totals.total,
            "cart updated"
        ),
        Err(err) => debug!(action, code = ?err.code, message = %err.message, "cart command rejected"),
    }

    result
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Same product with the same size, sugar, ice and extra shot: quantity
///   increases
/// - Otherwise: a new line, with the price frozen now
pub fn add_to_cart(
    cart: &CartState,
    product: Product,
    customization: Option<Customization>,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(
        cart,
        CartCommand::AddItem {
            product,
            customization,
        },
    )
}

/// Sets the quantity of a line. Zero or less removes it.
pub fn update_cart_item_quantity(
    cart: &CartState,
    cart_item_id: String,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(
        cart,
        CartCommand::UpdateQuantity {
            cart_item_id,
            quantity,
        },
    )
}

pub fn update_cart_item_size(
    cart: &CartState,
    cart_item_id: String,
    size: Option<PricedOption>,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::UpdateSize { cart_item_id, size })
}

pub fn update_cart_item_sugar(
    cart: &CartState,
    cart_item_id: String,
    sugar: Option<Choice>,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(
        cart,
        CartCommand::UpdateSugar {
            cart_item_id,
            sugar,
        },
    )
}

pub fn update_cart_item_ice(
    cart: &CartState,
    cart_item_id: String,
    ice: Option<Choice>,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::UpdateIce { cart_item_id, ice })
}

/// Selects an extra shot, or removes it if it is already the selected one.
///
/// The response's `extraShot` field says which happened.
pub fn toggle_extra_shot(
    cart: &CartState,
    cart_item_id: String,
    extra_shot: PricedOption,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(
        cart,
        CartCommand::ToggleExtraShot {
            cart_item_id,
            extra_shot,
        },
    )
}

pub fn update_cart_item_note(
    cart: &CartState,
    cart_item_id: String,
    note: Option<String>,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::UpdateNote { cart_item_id, note })
}

/// Removes a line. Unknown lines are ignored.
pub fn remove_from_cart(cart: &CartState, cart_item_id: String) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::RemoveItem { cart_item_id })
}

/// Parses the discount field and replaces the manual discount.
///
/// Text that is empty, not a number, or negative is rejected and the
/// previous discount stays.
pub fn set_discount(
    cart: &CartState,
    kind: DiscountKind,
    value: String,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::SetDiscount { kind, value })
}

pub fn remove_discount(cart: &CartState) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::RemoveDiscount)
}

pub fn set_order_note(cart: &CartState, note: String) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::SetNote { note })
}

pub fn remove_order_note(cart: &CartState) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::RemoveNote)
}

/// Replaces the promotion catalog used by every later read.
pub fn set_promotions(
    cart: &CartState,
    promotions: Option<Vec<Promotion>>,
) -> Result<CartResponse, ApiError> {
    apply_cart_command(cart, CartCommand::SetPromotions { promotions })
}

/// Clears lines, discount and note. Promotions stay.
///
/// ## When Used
/// - Cashier cancels the sale
/// - After an order is created
pub fn clear_cart(cart: &CartState) -> CartResponse {
    info!("Clearing cart");
    cart.with_cart_mut(|c| {
        c.remove_all();
        CartResponse::from(&*c)
    })
}
