//! # brew-core: Pure Pricing Logic for Brew POS
//!
//! The cart pricing and discount engine behind checkout and receipt totals.
//! Every function here is pure: no I/O, no logging, no clock reads except
//! the `Utc::now()` convenience wrappers on the cart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Brew POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Cashier UI                                   │   │
//! │  │    Menu ──► Customize ──► Cart panel ──► Checkout               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartCommand (JSON)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    register (app crate)                         │   │
//! │  │    CartState, commands::cart, commands::order, RegisterConfig   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brew-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │ promotions │  │ discount  │  │   cart    │  │   │
//! │  │   │ unit/line │  │  evaluate  │  │  manual   │  │ CartStore │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type over exact decimals
//! - [`types`] - Product, Promotion, options, order statuses
//! - [`pricing`] - Unit and line prices
//! - [`promotions`] - Promotion eligibility and amounts
//! - [`discount`] - The cashier's manual discount
//! - [`cart`] - The cart aggregate and its commands
//! - [`checkout`] - Checkout validation and order payloads
//! - [`validation`] - Raw input checks
//! - [`error`] - Domain error types
//!
//! ## Order of Discounts
//!
//! 1. Product discount, per unit, frozen on the line
//! 2. Promotions, summed, capped at the subtotal
//! 3. Manual discount, on what is left after promotions
//!
//! ## Example Usage
//!
//! ```rust
//! use brew_core::cart::{CartStore, Customization};
//! use brew_core::discount::{DiscountKind, ManualDiscount};
//! use brew_core::types::Product;
//! use brew_core::Money;
//!
//! let mut cart = CartStore::new();
//! let beans = Product {
//!     id: "beans".to_string(),
//!     name: "House Blend 250g".to_string(),
//!     image: None,
//!     price: 20.0,
//!     discount: 0.0,
//! };
//!
//! cart.add_item(&beans, Some(Customization { quantity: Some(2), ..Default::default() }))
//!     .unwrap();
//! cart.set_discount(ManualDiscount::new(DiscountKind::Percent, 10.0));
//!
//! assert_eq!(cart.cart_subtotal(), Money::from_cents(4000));
//! assert_eq!(cart.cart_total(), Money::from_cents(3600));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod promotions;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartCommand, CartStore, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a line or order note, in characters.
pub const MAX_NOTE_CHARS: usize = 500;
