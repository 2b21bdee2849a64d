//! # Cart
//!
//! The cashier's cart: line items, the manual discount, the order note and
//! the promotion catalog in force. Every total is recomputed from this state
//! when it is read; nothing is cached.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Mutation                         State change                          │
//! │  ────────                         ────────────                          │
//! │  add_item(product, options) ────► same selection? qty += n : push line  │
//! │  update_item_quantity(id, n) ───► n <= 0 ? remove line : qty = n        │
//! │  update_item_size/sugar/ice ────► replace selection on that line        │
//! │  toggle_extra_shot(id, shot) ───► same shot ? clear : select            │
//! │  set_discount / remove_discount ► replace / clear manual discount       │
//! │  set_promotions(catalog) ───────► replace catalog, lines untouched      │
//! │  remove_all() ──────────────────► clear lines, discount, note           │
//! │                                                                         │
//! │  Derived read (pure)              Formula                               │
//! │  ───────────────────              ───────                               │
//! │  cart_subtotal()                  Σ discounted unit × qty               │
//! │  promotion_discount_at(now)       min(Σ eligible promotions, subtotal)  │
//! │  discount_amount_at(now)          manual discount on (sub − promo)      │
//! │  cart_total_at(now)               max(0, sub − promo − manual)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every line has `quantity >= 1`; dropping to zero removes the line
//! - `0 <= cart_total <= cart_subtotal`
//! - A line's price and discount are frozen when it is added

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::discount::{DiscountKind, ManualDiscount};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing;
use crate::promotions::{self, AppliedPromotion, PromotionOutcome};
use crate::types::{Choice, Percentage, PricedOption, Product, Promotion};
use crate::validation::{normalize_note, validate_note, ValidationResult};

// =============================================================================
// Cart Line Item
// =============================================================================

/// One customized product in the cart.
///
/// ## Snapshot Pattern
/// `base_price` and `discount` are copied from the product when the line is
/// created. Catalog edits after that point do not reach this line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Line identifier (UUID v4).
    pub cart_item_id: String,

    pub product_id: String,
    pub name: String,
    pub image: Option<String>,

    /// Always at least 1.
    pub quantity: i64,

    /// List price at the time the line was added.
    #[ts(type = "string")]
    pub base_price: Money,

    /// Product discount at the time the line was added.
    #[ts(type = "string")]
    pub discount: Percentage,

    pub size: Option<PricedOption>,
    pub sugar: Option<Choice>,
    pub ice: Option<Choice>,

    /// At most one extra shot per line.
    pub extra_shot: Option<PricedOption>,

    pub note: Option<String>,
}

impl CartLineItem {
    /// Creates a line from a product, freezing its price and discount.
    fn from_product(product: &Product, customization: Customization, quantity: i64) -> Self {
        CartLineItem {
            cart_item_id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            quantity,
            base_price: product.price(),
            discount: product.discount(),
            size: customization.size,
            sugar: customization.sugar,
            ice: customization.ice,
            extra_shot: customization.extra_shot,
            note: normalize_note(customization.note),
        }
    }

    /// Whether this line holds `product_id` with exactly these selections.
    fn has_selection(&self, product_id: &str, customization: &Customization) -> bool {
        self.product_id == product_id
            && self.size.as_ref().map(|o| &o.id) == customization.size.as_ref().map(|o| &o.id)
            && self.sugar.as_ref().map(|c| &c.id) == customization.sugar.as_ref().map(|c| &c.id)
            && self.ice.as_ref().map(|c| &c.id) == customization.ice.as_ref().map(|c| &c.id)
            && self.extra_shot.as_ref().map(|o| &o.id)
                == customization.extra_shot.as_ref().map(|o| &o.id)
    }

    /// Unit price before the product discount.
    #[inline]
    pub fn unit_price(&self) -> Money {
        pricing::unit_price(self)
    }

    /// Unit price after the product discount.
    #[inline]
    pub fn discounted_unit_price(&self) -> Money {
        pricing::discounted_unit_price(self)
    }

    /// Line total after the product discount.
    #[inline]
    pub fn line_total(&self) -> Money {
        pricing::line_total(self)
    }
}

/// Options chosen for a product when it is added.
///
/// `quantity` is set by the product detail form, which adds several cups in
/// one go. Quick-add buttons leave it empty (one cup).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub size: Option<PricedOption>,
    pub sugar: Option<Choice>,
    pub ice: Option<Choice>,
    pub extra_shot: Option<PricedOption>,
    pub note: Option<String>,
    pub quantity: Option<i64>,
}

/// What a call to [`CartStore::toggle_extra_shot`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExtraShotToggle {
    /// The shot is now selected (replacing any other).
    Selected,
    /// The shot was already selected and has been removed.
    Cleared,
}

// =============================================================================
// Cart Commands
// =============================================================================

/// Every cart mutation as a value.
///
/// The register receives these from the UI and hands them to
/// [`CartStore::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CartCommand {
    AddItem {
        product: Product,
        #[serde(default)]
        customization: Option<Customization>,
    },
    RemoveItem {
        cart_item_id: String,
    },
    UpdateQuantity {
        cart_item_id: String,
        quantity: i64,
    },
    UpdateSize {
        cart_item_id: String,
        size: Option<PricedOption>,
    },
    UpdateSugar {
        cart_item_id: String,
        sugar: Option<Choice>,
    },
    UpdateIce {
        cart_item_id: String,
        ice: Option<Choice>,
    },
    ToggleExtraShot {
        cart_item_id: String,
        extra_shot: PricedOption,
    },
    UpdateNote {
        cart_item_id: String,
        note: Option<String>,
    },
    SetDiscount {
        kind: DiscountKind,
        value: String,
    },
    RemoveDiscount,
    SetNote {
        note: String,
    },
    RemoveNote,
    SetPromotions {
        promotions: Option<Vec<Promotion>>,
    },
    RemoveAll,
}

/// Result of [`CartStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A line was created or incremented.
    Added { cart_item_id: String },
    /// An extra shot was toggled.
    ExtraShot(ExtraShotToggle),
    /// Any other mutation.
    Done,
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Every derived figure of a cart, from a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub promotion_discount: Money,
    pub applied_promotions: Vec<AppliedPromotion>,
    /// Manual discount only.
    #[ts(type = "string")]
    pub discount_amount: Money,
    #[ts(type = "string")]
    pub total: Money,
}

impl CartTotals {
    /// Applied promotions worth showing the customer (amount above zero).
    pub fn visible_promotions(&self) -> impl Iterator<Item = &AppliedPromotion> {
        self.applied_promotions
            .iter()
            .filter(|promo| promo.discount_amount.is_positive())
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// The cart of one cashier session.
///
/// Owned by the session layer and passed by reference; there is no global
/// cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartLineItem>,
    discount: Option<ManualDiscount>,
    note: String,
    promotions: Vec<Promotion>,
}

impl CartStore {
    /// Creates a new empty cart with no promotions.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Lines in the order they were added.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Looks up a line by identifier.
    pub fn item(&self, cart_item_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.cart_item_id == cart_item_id)
    }

    fn item_mut(&mut self, cart_item_id: &str) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|i| i.cart_item_id == cart_item_id)
    }

    pub fn discount(&self) -> Option<&ManualDiscount> {
        self.discount.as_ref()
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of units across all lines, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, i| total.saturating_add(i.quantity))
    }

    // -------------------------------------------------------------------------
    // Line Mutations
    // -------------------------------------------------------------------------

    /// Adds a product, or increments the line with the same selections.
    ///
    /// ## Behavior
    /// - Same product + size + sugar + ice + extra shot: quantity grows by
    ///   the customization's quantity (1 when absent), saturating at
    ///   `i64::MAX`. The existing line keeps its own note; the incoming
    ///   note is only validated.
    /// - Anything different: a new line, price and discount frozen now
    ///
    /// ## Returns
    /// The identifier of the line that was created or incremented.
    ///
    /// ## Errors
    /// `Validation` if the customization's note is too long.
    pub fn add_item(
        &mut self,
        product: &Product,
        customization: Option<Customization>,
    ) -> CoreResult<String> {
        let customization = customization.unwrap_or_default();
        if let Some(note) = &customization.note {
            validate_note("note", note)?;
        }
        let quantity = customization.quantity.unwrap_or(1).max(1);

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.has_selection(&product.id, &customization))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return Ok(line.cart_item_id.clone());
        }

        let line = CartLineItem::from_product(product, customization, quantity);
        let id = line.cart_item_id.clone();
        self.items.push(line);
        Ok(id)
    }

    /// Removes a line. Returns `false` if there was no such line.
    pub fn remove_item(&mut self, cart_item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.cart_item_id != cart_item_id);
        self.items.len() != before
    }

    /// Sets a line's quantity; zero or less removes the line.
    ///
    /// No upper bound is enforced here; stock checks belong to the catalog.
    pub fn update_item_quantity(&mut self, cart_item_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(cart_item_id);
        }

        match self.item_mut(cart_item_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Replaces the size of one line.
    pub fn update_item_size(&mut self, cart_item_id: &str, size: Option<PricedOption>) -> bool {
        self.item_mut(cart_item_id)
            .map(|line| line.size = size)
            .is_some()
    }

    /// Replaces the sugar level of one line.
    pub fn update_item_sugar(&mut self, cart_item_id: &str, sugar: Option<Choice>) -> bool {
        self.item_mut(cart_item_id)
            .map(|line| line.sugar = sugar)
            .is_some()
    }

    /// Replaces the ice level of one line.
    pub fn update_item_ice(&mut self, cart_item_id: &str, ice: Option<Choice>) -> bool {
        self.item_mut(cart_item_id)
            .map(|line| line.ice = ice)
            .is_some()
    }

    /// Toggles an extra shot on one line.
    ///
    /// ```text
    /// none ──toggle(A)──► A ──toggle(A)──► none
    ///                     A ──toggle(B)──► B
    /// ```
    ///
    /// Returns `None` if there was no such line.
    pub fn toggle_extra_shot(
        &mut self,
        cart_item_id: &str,
        extra_shot: PricedOption,
    ) -> Option<ExtraShotToggle> {
        let line = self.item_mut(cart_item_id)?;

        if line.extra_shot.as_ref().map(|s| s.id.as_str()) == Some(extra_shot.id.as_str()) {
            line.extra_shot = None;
            Some(ExtraShotToggle::Cleared)
        } else {
            line.extra_shot = Some(extra_shot);
            Some(ExtraShotToggle::Selected)
        }
    }

    /// Replaces the note of one line. Returns `Ok(false)` if there was no
    /// such line.
    pub fn update_item_note(
        &mut self,
        cart_item_id: &str,
        note: Option<String>,
    ) -> ValidationResult<bool> {
        if let Some(note) = &note {
            validate_note("note", note)?;
        }

        Ok(self
            .item_mut(cart_item_id)
            .map(|line| line.note = normalize_note(note))
            .is_some())
    }

    // -------------------------------------------------------------------------
    // Cart-Level Mutations
    // -------------------------------------------------------------------------

    /// Replaces the manual discount.
    pub fn set_discount(&mut self, discount: ManualDiscount) {
        self.discount = Some(discount);
    }

    /// Parses raw discount text and replaces the manual discount.
    ///
    /// Rejected input leaves the current discount in place.
    pub fn set_discount_input(&mut self, kind: DiscountKind, raw: &str) -> ValidationResult<()> {
        let discount = ManualDiscount::parse(kind, raw)?;
        self.set_discount(discount);
        Ok(())
    }

    pub fn remove_discount(&mut self) {
        self.discount = None;
    }

    /// Sets the order-level note.
    pub fn set_note(&mut self, note: impl Into<String>) -> ValidationResult<()> {
        let note = note.into();
        validate_note("order note", &note)?;
        self.note = note;
        Ok(())
    }

    pub fn remove_note(&mut self) {
        self.note.clear();
    }

    /// Replaces the promotion catalog. `None` clears it.
    pub fn set_promotions(&mut self, promotions: Option<Vec<Promotion>>) {
        self.promotions = promotions.unwrap_or_default();
    }

    /// Clears lines, manual discount and note. The promotion catalog is store
    /// configuration and stays.
    pub fn remove_all(&mut self) {
        self.items.clear();
        self.discount = None;
        self.note.clear();
    }

    /// Applies a [`CartCommand`].
    ///
    /// ## Errors
    /// - `CartItemNotFound` when a line-level update names an unknown line
    ///   (`RemoveItem` on an unknown line is a no-op)
    /// - `Validation` for rejected discount text or over-long notes
    pub fn apply(&mut self, command: CartCommand) -> CoreResult<CommandOutcome> {
        let found = |found: bool, id: String| {
            if found {
                Ok(CommandOutcome::Done)
            } else {
                Err(CoreError::CartItemNotFound(id))
            }
        };

        match command {
            CartCommand::AddItem {
                product,
                customization,
            } => {
                let cart_item_id = self.add_item(&product, customization)?;
                Ok(CommandOutcome::Added { cart_item_id })
            }
            CartCommand::RemoveItem { cart_item_id } => {
                self.remove_item(&cart_item_id);
                Ok(CommandOutcome::Done)
            }
            CartCommand::UpdateQuantity {
                cart_item_id,
                quantity,
            } => {
                if quantity <= 0 {
                    self.remove_item(&cart_item_id);
                    return Ok(CommandOutcome::Done);
                }
                let ok = self.update_item_quantity(&cart_item_id, quantity);
                found(ok, cart_item_id)
            }
            CartCommand::UpdateSize { cart_item_id, size } => {
                let ok = self.update_item_size(&cart_item_id, size);
                found(ok, cart_item_id)
            }
            CartCommand::UpdateSugar {
                cart_item_id,
                sugar,
            } => {
                let ok = self.update_item_sugar(&cart_item_id, sugar);
                found(ok, cart_item_id)
            }
            CartCommand::UpdateIce { cart_item_id, ice } => {
                let ok = self.update_item_ice(&cart_item_id, ice);
                found(ok, cart_item_id)
            }
            CartCommand::ToggleExtraShot {
                cart_item_id,
                extra_shot,
            } => self
                .toggle_extra_shot(&cart_item_id, extra_shot)
                .map(CommandOutcome::ExtraShot)
                .ok_or(CoreError::CartItemNotFound(cart_item_id)),
            CartCommand::UpdateNote { cart_item_id, note } => {
                let ok = self.update_item_note(&cart_item_id, note)?;
                found(ok, cart_item_id)
            }
            CartCommand::SetDiscount { kind, value } => {
                self.set_discount_input(kind, &value)?;
                Ok(CommandOutcome::Done)
            }
            CartCommand::RemoveDiscount => {
                self.remove_discount();
                Ok(CommandOutcome::Done)
            }
            CartCommand::SetNote { note } => {
                self.set_note(note)?;
                Ok(CommandOutcome::Done)
            }
            CartCommand::RemoveNote => {
                self.remove_note();
                Ok(CommandOutcome::Done)
            }
            CartCommand::SetPromotions { promotions } => {
                self.set_promotions(promotions);
                Ok(CommandOutcome::Done)
            }
            CartCommand::RemoveAll => {
                self.remove_all();
                Ok(CommandOutcome::Done)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Derived Reads
    // -------------------------------------------------------------------------

    /// Σ discounted unit price × quantity: product discounts included,
    /// promotions and manual discount not.
    pub fn cart_subtotal(&self) -> Money {
        pricing::cart_subtotal(&self.items)
    }

    /// Evaluates the promotion catalog at `now`.
    pub fn promotion_outcome_at(&self, now: DateTime<Utc>) -> PromotionOutcome {
        promotions::evaluate(&self.items, &self.promotions, now)
    }

    /// Total promotion discount at `now`, never above the subtotal.
    pub fn promotion_discount_at(&self, now: DateTime<Utc>) -> Money {
        self.promotion_outcome_at(now).promotion_discount
    }

    pub fn promotion_discount(&self) -> Money {
        self.promotion_discount_at(Utc::now())
    }

    /// Every eligible promotion at `now`, including zero-value ones.
    pub fn applied_promotions_at(&self, now: DateTime<Utc>) -> Vec<AppliedPromotion> {
        self.promotion_outcome_at(now).applied_promotions
    }

    pub fn applied_promotions(&self) -> Vec<AppliedPromotion> {
        self.applied_promotions_at(Utc::now())
    }

    /// The MANUAL discount amount at `now`, applied after promotions.
    ///
    /// Product discounts and promotions are not part of this figure.
    pub fn discount_amount_at(&self, now: DateTime<Utc>) -> Money {
        let base = self
            .cart_subtotal()
            .saturating_sub(self.promotion_discount_at(now));
        self.manual_discount_on(base)
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount_at(Utc::now())
    }

    /// `max(0, subtotal − promotion discount − manual discount)` at `now`.
    pub fn cart_total_at(&self, now: DateTime<Utc>) -> Money {
        self.totals_at(now).total
    }

    pub fn cart_total(&self) -> Money {
        self.cart_total_at(Utc::now())
    }

    /// All derived figures from one promotion evaluation.
    pub fn totals_at(&self, now: DateTime<Utc>) -> CartTotals {
        let subtotal = self.cart_subtotal();
        let outcome = self.promotion_outcome_at(now);
        let after_promotions = subtotal.saturating_sub(outcome.promotion_discount);
        let discount_amount = self.manual_discount_on(after_promotions);

        CartTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            subtotal,
            promotion_discount: outcome.promotion_discount,
            applied_promotions: outcome.applied_promotions,
            discount_amount,
            total: after_promotions.saturating_sub(discount_amount),
        }
    }

    pub fn totals(&self) -> CartTotals {
        self.totals_at(Utc::now())
    }

    fn manual_discount_on(&self, base: Money) -> Money {
        self.discount
            .as_ref()
            .map_or(Money::zero(), |discount| discount.amount_against(base))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PromotionType;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn product(id: &str, price: f64, discount: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            image: None,
            price,
            discount,
        }
    }

    fn large() -> PricedOption {
        PricedOption::new("size-l", "Large", 0.5)
    }

    fn shot(id: &str) -> PricedOption {
        PricedOption::new(id, "Extra shot", 0.75)
    }

    fn promotion(promotion_type: PromotionType, now: DateTime<Utc>) -> Promotion {
        Promotion {
            id: "promo".to_string(),
            name: "Promo".to_string(),
            promotion_type,
            buy_quantity: None,
            free_quantity: None,
            discount: None,
            start_date: now - Duration::hours(1),
            end_date: now + Duration::hours(1),
            is_active: true,
            product_ids: Vec::new(),
        }
    }

    fn assert_invariants(cart: &CartStore, now: DateTime<Utc>) {
        let totals = cart.totals_at(now);
        assert!(!totals.total.is_negative());
        assert!(totals.total <= totals.subtotal);
        assert!(totals.promotion_discount <= totals.subtotal);
        assert!(totals.discount_amount <= totals.subtotal - totals.promotion_discount);
        assert!(cart.items().iter().all(|i| i.quantity >= 1));
        assert_eq!(totals, cart.totals_at(now));
    }

    // -------------------------------------------------------------------------
    // Scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn test_scenario_line_with_modifiers_and_discount() {
        let mut cart = CartStore::new();
        let id = cart
            .add_item(
                &product("latte", 4.0, 10.0),
                Some(Customization {
                    size: Some(large()),
                    extra_shot: Some(shot("shot")),
                    quantity: Some(2),
                    ..Default::default()
                }),
            )
            .unwrap();

        let line = cart.item(&id).unwrap();
        assert_eq!(line.unit_price(), Money::from_cents(525));
        assert_eq!(
            line.discounted_unit_price(),
            Money::from_decimal(Decimal::new(4725, 3))
        );
        assert_eq!(line.line_total(), Money::from_cents(945));
        assert_eq!(cart.cart_subtotal(), Money::from_cents(945));
    }

    #[test]
    fn test_scenario_fixed_promotion_then_percent_manual() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        cart.add_item(
            &product("beans", 20.0, 0.0),
            None,
        )
        .unwrap();
        cart.set_promotions(Some(vec![Promotion {
            discount: Some(3.0),
            ..promotion(PromotionType::FixedDiscount, now)
        }]));
        cart.set_discount(ManualDiscount::new(DiscountKind::Percent, 10.0));

        assert_eq!(cart.cart_subtotal(), Money::from_cents(2000));
        assert_eq!(cart.promotion_discount_at(now), Money::from_cents(300));
        assert_eq!(cart.discount_amount_at(now), Money::from_cents(170));
        assert_eq!(cart.cart_total_at(now), Money::from_cents(1530));
    }

    #[test]
    fn test_scenario_buy_two_get_one() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        cart.add_item(
            &product("americano", 3.0, 0.0),
            Some(Customization {
                quantity: Some(6),
                ..Default::default()
            }),
        )
        .unwrap();
        cart.set_promotions(Some(vec![Promotion {
            buy_quantity: Some(2),
            free_quantity: Some(1),
            ..promotion(PromotionType::BuyXGetY, now)
        }]));

        assert_eq!(cart.promotion_discount_at(now), Money::from_cents(600));
        assert_eq!(cart.cart_total_at(now), Money::from_cents(1200));
    }

    #[test]
    fn test_scenario_amount_discount_clamps_to_subtotal() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        cart.add_item(&product("beans", 50.0, 0.0), None).unwrap();
        cart.set_discount_input(DiscountKind::Amount, "500").unwrap();

        assert_eq!(cart.discount_amount_at(now), Money::from_cents(5000));
        assert!(cart.cart_total_at(now).is_zero());
    }

    #[test]
    fn test_scenario_same_selection_merges() {
        let mut cart = CartStore::new();
        let latte = product("latte", 4.5, 0.0);
        let options = Customization {
            size: Some(large()),
            sugar: Some(Choice::new("s50", "50%")),
            ice: Some(Choice::new("i0", "No ice")),
            ..Default::default()
        };

        let first = cart.add_item(&latte, Some(options.clone())).unwrap();
        let second = cart.add_item(&latte, Some(options)).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    #[test]
    fn test_different_selection_creates_new_line() {
        let mut cart = CartStore::new();
        let latte = product("latte", 4.5, 0.0);

        cart.add_item(&latte, None).unwrap();
        cart.add_item(
            &latte,
            Some(Customization {
                extra_shot: Some(shot("shot")),
                ..Default::default()
            }),
        )
        .unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_price_is_frozen_at_add_time() {
        let mut cart = CartStore::new();
        let mut latte = product("latte", 4.0, 0.0);
        cart.add_item(&latte, None).unwrap();

        latte.price = 9.0;
        latte.discount = 50.0;
        cart.add_item(&latte, None).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].base_price, Money::from_cents(400));
        assert_eq!(cart.cart_subtotal(), Money::from_cents(800));
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = CartStore::new();
        let id = cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();

        assert!(cart.update_item_quantity(&id, 3));
        assert_eq!(cart.total_quantity(), 3);

        assert!(cart.update_item_quantity(&id, 0));
        assert!(cart.is_empty());
        assert!(!cart.update_item_quantity(&id, 2));
    }

    #[test]
    fn test_quantity_saturates_instead_of_overflowing() {
        let mut cart = CartStore::new();
        let latte = product("latte", 4.0, 0.0);
        let huge = Customization {
            quantity: Some(i64::MAX),
            ..Default::default()
        };

        let id = cart.add_item(&latte, Some(huge.clone())).unwrap();
        assert_eq!(cart.add_item(&latte, Some(huge)).unwrap(), id);
        assert_eq!(cart.item(&id).unwrap().quantity, i64::MAX);

        let other = cart.add_item(&product("mocha", 5.0, 0.0), None).unwrap();
        assert!(cart.update_item_quantity(&other, i64::MAX));

        let now = Utc::now();
        let totals = cart.totals_at(now);
        assert_eq!(totals.total_quantity, i64::MAX);
        assert!(totals.subtotal.is_positive());
        assert_invariants(&cart, now);
    }

    #[test]
    fn test_merge_keeps_the_existing_note() {
        let mut cart = CartStore::new();
        let latte = product("latte", 4.0, 0.0);
        let with_note = |note: &str| Customization {
            note: Some(note.to_string()),
            ..Default::default()
        };

        let id = cart.add_item(&latte, Some(with_note("oat milk"))).unwrap();
        assert_eq!(
            cart.add_item(&latte, Some(with_note("extra hot"))).unwrap(),
            id
        );

        let line = cart.item(&id).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.note.as_deref(), Some("oat milk"));
    }

    #[test]
    fn test_remove_unknown_item_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();
        assert!(!cart.remove_item("missing"));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_update_selections_touch_one_line() {
        let mut cart = CartStore::new();
        let a = cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();
        let b = cart.add_item(&product("mocha", 5.0, 0.0), None).unwrap();

        assert!(cart.update_item_size(&a, Some(large())));
        assert!(cart.update_item_sugar(&a, Some(Choice::new("s0", "No sugar"))));
        assert!(cart.update_item_ice(&a, Some(Choice::new("i1", "Less ice"))));

        assert_eq!(cart.item(&a).unwrap().unit_price(), Money::from_cents(450));
        assert!(cart.item(&b).unwrap().size.is_none());
        assert!(cart.item(&b).unwrap().sugar.is_none());
        assert!(!cart.update_item_size("missing", None));
    }

    #[test]
    fn test_toggle_extra_shot_twice_restores_line() {
        let mut cart = CartStore::new();
        let id = cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();
        let original = cart.item(&id).unwrap().clone();

        assert_eq!(
            cart.toggle_extra_shot(&id, shot("oat")),
            Some(ExtraShotToggle::Selected)
        );
        assert_eq!(cart.item(&id).unwrap().unit_price(), Money::from_cents(475));

        assert_eq!(
            cart.toggle_extra_shot(&id, shot("oat")),
            Some(ExtraShotToggle::Cleared)
        );
        assert_eq!(cart.item(&id).unwrap(), &original);
    }

    #[test]
    fn test_toggle_other_extra_shot_replaces() {
        let mut cart = CartStore::new();
        let id = cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();

        cart.toggle_extra_shot(&id, shot("a"));
        assert_eq!(
            cart.toggle_extra_shot(&id, shot("b")),
            Some(ExtraShotToggle::Selected)
        );
        assert_eq!(cart.item(&id).unwrap().extra_shot.as_ref().unwrap().id, "b");
        assert_eq!(cart.toggle_extra_shot("missing", shot("a")), None);
    }

    #[test]
    fn test_notes_are_validated() {
        let mut cart = CartStore::new();
        let too_long = "x".repeat(501);

        let err = cart
            .add_item(
                &product("latte", 4.0, 0.0),
                Some(Customization {
                    note: Some(too_long.clone()),
                    ..Default::default()
                }),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(cart.is_empty());

        let id = cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();
        assert!(cart.update_item_note(&id, Some(too_long.clone())).is_err());
        assert!(cart.update_item_note(&id, Some(" oat milk ".to_string())).unwrap());
        assert_eq!(cart.item(&id).unwrap().note.as_deref(), Some("oat milk"));

        assert!(cart.set_note(too_long).is_err());
        cart.set_note("table 4").unwrap();
        assert_eq!(cart.note(), "table 4");
        cart.remove_note();
        assert_eq!(cart.note(), "");
    }

    #[test]
    fn test_rejected_discount_input_keeps_previous() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        cart.add_item(&product("beans", 10.0, 0.0), None).unwrap();
        cart.set_discount_input(DiscountKind::Percent, "20").unwrap();

        assert!(cart.set_discount_input(DiscountKind::Amount, "abc").is_err());
        assert_eq!(cart.discount().map(ManualDiscount::kind), Some(DiscountKind::Percent));
        assert_eq!(cart.discount_amount_at(now), Money::from_cents(200));

        cart.remove_discount();
        assert!(cart.discount_amount_at(now).is_zero());
    }

    #[test]
    fn test_remove_all_keeps_promotions() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();
        cart.set_discount(ManualDiscount::new(DiscountKind::Amount, 1.0));
        cart.set_note("to go").unwrap();
        cart.set_promotions(Some(vec![promotion(PromotionType::PercentDiscount, now)]));

        cart.remove_all();

        assert!(cart.is_empty());
        assert!(cart.discount().is_none());
        assert_eq!(cart.note(), "");
        assert_eq!(cart.promotions().len(), 1);
        assert!(cart.cart_subtotal().is_zero());
        assert!(cart.cart_total_at(now).is_zero());
    }

    #[test]
    fn test_set_promotions_none_clears_catalog() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        cart.set_promotions(Some(vec![promotion(PromotionType::PercentDiscount, now)]));
        cart.set_promotions(None);
        assert!(cart.promotions().is_empty());
    }

    // -------------------------------------------------------------------------
    // Derived Reads
    // -------------------------------------------------------------------------

    #[test]
    fn test_nan_product_fields_keep_totals_finite() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        cart.add_item(&product("broken", f64::NAN, f64::NAN), None).unwrap();
        cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();
        cart.set_discount(ManualDiscount::new(DiscountKind::Percent, f64::NAN));

        assert_eq!(cart.cart_subtotal(), Money::from_cents(400));
        assert_eq!(cart.cart_total_at(now), Money::from_cents(400));
    }

    #[test]
    fn test_visible_promotions_hide_zero_amounts() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        cart.add_item(&product("latte", 4.0, 0.0), None).unwrap();
        cart.set_promotions(Some(vec![
            Promotion {
                id: "bogo".to_string(),
                buy_quantity: Some(2),
                free_quantity: Some(1),
                ..promotion(PromotionType::BuyXGetY, now)
            },
            Promotion {
                id: "pct".to_string(),
                discount: Some(25.0),
                ..promotion(PromotionType::PercentDiscount, now)
            },
        ]));

        let totals = cart.totals_at(now);
        assert_eq!(totals.applied_promotions.len(), 2);
        let visible: Vec<_> = totals.visible_promotions().collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].promotion_id, "pct");
        assert_eq!(totals.total, Money::from_cents(300));
    }

    #[test]
    fn test_invariants_hold_through_a_session() {
        let now = Utc::now();
        let mut cart = CartStore::new();
        assert_invariants(&cart, now);

        cart.set_promotions(Some(vec![
            Promotion {
                discount: Some(60.0),
                ..promotion(PromotionType::PercentDiscount, now)
            },
            Promotion {
                discount: Some(7.0),
                ..promotion(PromotionType::FixedDiscount, now)
            },
        ]));
        let latte = cart.add_item(&product("latte", 4.5, 10.0), None).unwrap();
        assert_invariants(&cart, now);

        cart.add_item(&product("scone", 3.25, 0.0), None).unwrap();
        cart.update_item_quantity(&latte, 4);
        assert_invariants(&cart, now);

        cart.set_discount(ManualDiscount::new(DiscountKind::Amount, 1000.0));
        assert_invariants(&cart, now);
        assert!(cart.cart_total_at(now).is_zero());

        cart.set_discount(ManualDiscount::new(DiscountKind::Percent, 15.0));
        cart.toggle_extra_shot(&latte, shot("shot"));
        assert_invariants(&cart, now);

        cart.remove_all();
        assert_invariants(&cart, now);
        assert!(cart.cart_total_at(now).is_zero());
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    #[test]
    fn test_apply_commands_from_json() {
        let mut cart = CartStore::new();

        let add: CartCommand = serde_json::from_str(
            r#"{
                "action": "add_item",
                "product": { "id": "latte", "name": "Latte", "price": 4.0 },
                "customization": { "quantity": 2 }
            }"#,
        )
        .unwrap();
        let CommandOutcome::Added { cart_item_id } = cart.apply(add).unwrap() else {
            panic!("expected Added");
        };

        let toggle = CartCommand::ToggleExtraShot {
            cart_item_id: cart_item_id.clone(),
            extra_shot: shot("shot"),
        };
        assert_eq!(
            cart.apply(toggle).unwrap(),
            CommandOutcome::ExtraShot(ExtraShotToggle::Selected)
        );

        let discount: CartCommand = serde_json::from_str(
            r#"{ "action": "set_discount", "kind": "amount", "value": "1.5" }"#,
        )
        .unwrap();
        cart.apply(discount).unwrap();

        assert_eq!(cart.cart_subtotal(), Money::from_cents(950));
        assert_eq!(cart.discount_amount(), Money::from_cents(150));
        assert_eq!(cart.cart_total(), Money::from_cents(800));
    }

    #[test]
    fn test_apply_reports_unknown_line() {
        let mut cart = CartStore::new();

        let err = cart
            .apply(CartCommand::UpdateSize {
                cart_item_id: "missing".to_string(),
                size: None,
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::CartItemNotFound(id) if id == "missing"));

        assert_eq!(
            cart.apply(CartCommand::RemoveItem {
                cart_item_id: "missing".to_string()
            })
            .unwrap(),
            CommandOutcome::Done
        );
        assert_eq!(
            cart.apply(CartCommand::UpdateQuantity {
                cart_item_id: "missing".to_string(),
                quantity: 0,
            })
            .unwrap(),
            CommandOutcome::Done
        );
    }

    #[test]
    fn test_apply_rejects_bad_discount_text() {
        let mut cart = CartStore::new();
        let err = cart
            .apply(CartCommand::SetDiscount {
                kind: DiscountKind::Percent,
                value: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(cart.discount().is_none());
    }
}
