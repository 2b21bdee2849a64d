//! # Error Types
//!
//! Domain-specific error types for brew-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brew-core errors (this file)                                           │
//! │  ├── CoreError        - Cart and checkout failures                      │
//! │  └── ValidationError  - Raw input rejected before it reaches the cart   │
//! │                                                                         │
//! │  register errors (app crate)                                            │
//! │  ├── ApiError         - What the cashier UI sees (serialized)           │
//! │  └── ConfigError      - register.toml / environment problems            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What is NOT an error
//! Out-of-range numbers (a 150% manual discount, a `NaN` price) are clamped,
//! never rejected. Only input that is not a number at all, or a selection the
//! order cannot be made without, stops the cashier.

use thiserror::Error;

use crate::checkout::MissingSelection;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No cart line with this identifier.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// One or more lines lack a size or sugar level their product requires.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout
    ///      │
    ///      ▼
    /// Latte has sizes, line has none
    ///      │
    ///      ▼
    /// MissingSelections([Latte: size])
    ///      │
    ///      ▼
    /// UI shows: "Please complete selections: Latte (size)"
    /// ```
    #[error("Please complete selections: {}", describe_missing(.0))]
    MissingSelections(Vec<MissingSelection>),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn describe_missing(missing: &[MissingSelection]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when raw cashier input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Text that should hold a number does not parse as a finite number.
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::RequiredSelection;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "discount".to_string(),
        };
        assert_eq!(err.to_string(), "discount is required");

        let err = ValidationError::InvalidNumber {
            field: "discount".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "discount must be a number, got 'abc'");
    }

    #[test]
    fn test_missing_selections_message_lists_items() {
        let err = CoreError::MissingSelections(vec![
            MissingSelection {
                cart_item_id: "a".to_string(),
                product_name: "Latte".to_string(),
                missing: vec![RequiredSelection::Size, RequiredSelection::Sugar],
            },
            MissingSelection {
                cart_item_id: "b".to_string(),
                product_name: "Mocha".to_string(),
                missing: vec![RequiredSelection::Size],
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Please complete selections: Latte (size, sugar level); Mocha (size)"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "note".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
