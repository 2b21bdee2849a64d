//! # Validation Module
//!
//! Input validation for what the cashier types.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Cashier UI                                                    │
//! │  └── Free-form numeric fields, must stay responsive                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Reject: empty / non-numeric / negative discount text               │
//! │  └── Reject: notes longer than MAX_NOTE_CHARS                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart math                                                     │
//! │  └── Clamp: out-of-range numbers, NaN → 0                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_NOTE_CHARS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Text Validators
// =============================================================================

/// Validates a free-text note (line item or order).
///
/// ## Rules
/// - At most [`MAX_NOTE_CHARS`] characters (not bytes)
///
/// ```rust
/// use brew_core::validation::validate_note;
///
/// assert!(validate_note("note", "oat milk, extra hot").is_ok());
/// assert!(validate_note("note", &"x".repeat(501)).is_err());
/// ```
pub fn validate_note(field: &str, note: &str) -> ValidationResult<()> {
    if note.chars().count() > MAX_NOTE_CHARS {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NOTE_CHARS,
        });
    }

    Ok(())
}

/// Trims a note and drops it when nothing is left.
pub fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses the text of the manual discount field.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a finite number
/// - Must not be negative
///
/// Range is NOT checked here: 150 (%) is a valid number and gets clamped
/// by the discount policy.
///
/// ```rust
/// use brew_core::validation::parse_discount_value;
///
/// assert_eq!(parse_discount_value("12.5").unwrap(), 12.5);
/// assert!(parse_discount_value("").is_err());
/// assert!(parse_discount_value("NaN").is_err());
/// ```
pub fn parse_discount_value(raw: &str) -> ValidationResult<f64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "discount".to_string(),
        });
    }

    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field: "discount".to_string(),
            value: raw.to_string(),
        })?;

    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "discount".to_string(),
        });
    }

    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_note_counts_chars() {
        assert!(validate_note("note", "").is_ok());
        assert!(validate_note("note", &"a".repeat(500)).is_ok());
        assert!(validate_note("note", &"a".repeat(501)).is_err());
        // 500 multi-byte characters are still 500 characters
        assert!(validate_note("note", &"é".repeat(500)).is_ok());
    }

    #[test]
    fn test_normalize_note() {
        assert_eq!(normalize_note(None), None);
        assert_eq!(normalize_note(Some("   ".to_string())), None);
        assert_eq!(
            normalize_note(Some(" less ice ".to_string())),
            Some("less ice".to_string())
        );
    }

    #[test]
    fn test_parse_discount_value() {
        assert_eq!(parse_discount_value("0").unwrap(), 0.0);
        assert_eq!(parse_discount_value(" 15 ").unwrap(), 15.0);
        assert_eq!(parse_discount_value("500").unwrap(), 500.0);

        assert!(parse_discount_value("").is_err());
        assert!(parse_discount_value("   ").is_err());
        assert!(parse_discount_value("abc").is_err());
        assert!(parse_discount_value("inf").is_err());
        assert!(parse_discount_value("NaN").is_err());
        assert!(parse_discount_value("-1").is_err());
    }
}
