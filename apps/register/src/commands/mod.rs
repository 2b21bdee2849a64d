//! # Commands Module
//!
//! Everything the cashier UI can ask of the register.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── cart.rs     ◄─── Cart manipulation, returns cart + totals
//! └── order.rs    ◄─── Order submission through OrderApi
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier UI                                                             │
//! │  ──────────                                                             │
//! │  { "action": "set_discount", "kind": "percent", "value": "10" }         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Register                                                               │
//! │  ────────                                                               │
//! │  fn apply_cart_command(                                                 │
//! │      cart: &CartState,        ◄── Session state                         │
//! │      command: CartCommand,    ◄── Deserialized request                  │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  UI receives: { items, totals, visiblePromotions, ... }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod order;
