//! # Order Commands
//!
//! Turns the cart into an order through an external order API.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit_order                                         │
//! │                                                                         │
//! │  1. Lock cart ─► validate selections ─► snapshot payload ─► unlock      │
//! │        │ blocked: CHECKOUT_BLOCKED, cart untouched                      │
//! │        ▼                                                                │
//! │  2. POST order header                                                   │
//! │        │ failed: ORDER_FAILED, cart untouched                           │
//! │        ▼                                                                │
//! │  3. POST each line item                                                 │
//! │        │ any failed: PARTIAL_ORDER (order id + count), cart untouched   │
//! │        ▼                                                                │
//! │  4. Clear cart (promotions stay) ─► OrderReceipt                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried. A partial order needs a person to look at it, so the
//! cart is kept for reference.

use brew_core::checkout::{prepare_order, OrderLinePayload, OrderPayload, ProductOptionCatalog};
use brew_core::Money;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::{ApiError, ErrorCode};
use crate::state::{CartState, RegisterConfig};

// =============================================================================
// Order API
// =============================================================================

/// Failure reported by the order API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// The persistence service that records orders.
///
/// The register only talks to it through this trait.
#[allow(async_fn_in_trait)]
pub trait OrderApi {
    /// Creates the order header and returns its identifier.
    async fn create_order(&self, order: &OrderPayload) -> Result<String, OrderApiError>;

    /// Records one line item under `order_id`.
    async fn create_order_line(
        &self,
        order_id: &str,
        line: &OrderLinePayload,
    ) -> Result<(), OrderApiError>;
}

// =============================================================================
// Submit
// =============================================================================

/// What the cashier sees after a successful order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub line_count: usize,
    pub discount: Money,
    pub total: Money,
    /// `total` in the configured display currency.
    pub formatted_total: String,
}

/// Submits the cart as an order.
///
/// ## Errors
/// - `CHECKOUT_BLOCKED`: empty cart or missing size / sugar selections
/// - `ORDER_FAILED`: the order header was not created
/// - `PARTIAL_ORDER`: the header exists but some line items were not recorded
///
/// The cart is cleared only on success.
pub async fn submit_order<A, C>(
    cart: &CartState,
    api: &A,
    catalog: &C,
    config: &RegisterConfig,
) -> Result<OrderReceipt, ApiError>
where
    A: OrderApi,
    C: ProductOptionCatalog,
{
    let submission = cart
        .with_cart(|c| prepare_order(c, catalog, config.checkout_options(), Utc::now()))
        .map_err(|err| {
            let err = ApiError::from(err);
            warn!(code = ?err.code, message = %err.message, "Checkout blocked");
            err
        })?;

    let order_id = api.create_order(&submission.order).await.map_err(|err| {
        error!(error = %err, "Order header creation failed");
        ApiError::from(err)
    })?;
    info!(order_id = %order_id, total = %submission.order.total, "Order created");

    let mut failed = 0;
    for line in &submission.lines {
        if let Err(err) = api.create_order_line(&order_id, line).await {
            error!(
                order_id = %order_id,
                product_id = %line.product_id,
                error = %err,
                "Order line creation failed"
            );
            failed += 1;
        }
    }

    let line_count = submission.lines.len();
    if failed > 0 {
        error!(order_id = %order_id, failed, line_count, "Order is incomplete");
        return Err(ApiError::partial_order(&order_id, failed, line_count));
    }

    cart.with_cart_mut(|c| c.remove_all());
    info!(order_id = %order_id, line_count, "Order submitted, cart cleared");

    Ok(OrderReceipt {
        order_id,
        line_count,
        discount: submission.order.discount,
        total: submission.order.total,
        formatted_total: config.format_money(submission.order.total),
    })
}

/// Whether a failed submission left an order behind that needs review.
pub fn needs_review(err: &ApiError) -> bool {
    err.code == ErrorCode::PartialOrder
}
