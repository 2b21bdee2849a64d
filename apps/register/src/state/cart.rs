//! # Cart State
//!
//! Holds the cart of the current cashier session.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. The UI and order submission both reach the same cart
//! 2. Only one command should modify the cart at a time
//! 3. Commands may run on different threads
//!
//! The lock is never held across an `.await`: order submission snapshots the
//! cart, releases the lock, and locks again only to clear it.

use std::sync::{Arc, Mutex, MutexGuard};

use brew_core::CartStore;
use tracing::warn;

/// Shared handle to the session's [`CartStore`].
///
/// Cloning the handle shares the cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<CartStore>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use register::state::CartState;
    ///
    /// let state = CartState::new();
    /// let empty = state.with_cart(|cart| cart.is_empty());
    /// assert!(empty);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStore) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartStore) -> R,
    {
        let mut cart = self.lock();
        f(&mut cart)
    }

    /// A panic inside a command must not lock the cashier out of the cart.
    fn lock(&self) -> MutexGuard<'_, CartStore> {
        self.cart.lock().unwrap_or_else(|poisoned| {
            warn!("Cart mutex was poisoned by a panicked command; recovering");
            poisoned.into_inner()
        })
    }
}
