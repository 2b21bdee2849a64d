//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Brew POS                               │
//! │                                                                         │
//! │  Cashier UI                  Register                                   │
//! │  ──────────                  ────────                                   │
//! │                                                                         │
//! │  set_discount("abc")                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad input? ────── ValidationError ─────────────┐                │  │
//! │  │         │                                        │                │  │
//! │  │         ▼                                        ▼                │  │
//! │  │  Checkout blocked? ── CoreError ─────────────► ApiError ────────►│  │
//! │  │         │                                        ▲                │  │
//! │  │         ▼                                        │                │  │
//! │  │  Order API down? ─── OrderApiError ──────────────┘                │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "CHECKOUT_BLOCKED",                                          │
//! │    "message": "Please complete selections: Latte (size)" }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use brew_core::{CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

use crate::commands::order::OrderApiError;

/// API error returned from register commands.
///
/// ## Serialization
/// This is what the cashier UI receives when a command fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "discount must be a number, got 'abc'"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Cart line not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Checkout refused: empty cart or missing selections
    CheckoutBlocked,

    /// The order header could not be created; nothing was recorded
    OrderFailed,

    /// The order header exists but some line items were not recorded
    PartialOrder,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a partial order error naming what was left behind.
    pub fn partial_order(order_id: &str, failed: usize, total: usize) -> Self {
        ApiError::new(
            ErrorCode::PartialOrder,
            format!(
                "Order {} was created but {} of {} line items failed; review it before retrying",
                order_id, failed, total
            ),
        )
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CartItemNotFound(id) => ApiError::not_found("Cart item", &id),
            err @ (CoreError::EmptyCart | CoreError::MissingSelections(_)) => {
                ApiError::new(ErrorCode::CheckoutBlocked, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Order header failures. Line-level failures are reported as
/// [`ApiError::partial_order`] instead.
impl From<OrderApiError> for ApiError {
    fn from(err: OrderApiError) -> Self {
        ApiError::new(ErrorCode::OrderFailed, format!("Order was not created: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors loading `register.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================
