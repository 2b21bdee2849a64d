//! # State Module
//!
//! Session state for one register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Register State                                       │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────────┐    │
//! │  │       CartState          │      │       RegisterConfig         │    │
//! │  │                          │      │                              │    │
//! │  │  • Lines, discount, note │      │  • Store name                │    │
//! │  │  • Promotion catalog     │      │  • Currency display          │    │
//! │  │  • Arc<Mutex<CartStore>> │      │  • Checkout defaults         │    │
//! │  └──────────────────────────┘      └──────────────────────────────┘    │
//! │                                                                         │
//! │  Commands take only the state they need.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;

pub use cart::CartState;
pub use config::{
    CheckoutSettings, CurrencySettings, LoggingSettings, RegisterConfig, StoreSettings,
    DEFAULT_LOG_FILTER,
};
