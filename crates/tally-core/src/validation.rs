//! # Validation Module
//!
//! Input validation utilities for Tally.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (API, UI)                                             │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (fail fast, before any math)                     │
//! │  ├── Malformed numbers (negative price, zero quantity)                 │
//! │  └── Business rule validation                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── CHECK constraints                                                 │
//! │                                                                         │
//! │  Malformed input is a caller bug and fails loudly here. Contrast       │
//! │  with stale coupons, which are business outcomes and never fail.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use tally_core::validation::{validate_coupon_code, validate_quantity};
//!
//! // Validate code before database insert
//! validate_coupon_code("WELCOME10").unwrap();
//!
//! // Validate quantity before cart operation
//! validate_quantity(5).unwrap();
//! ```

use crate::coupon::DiscountKind;
use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    // Check for valid characters (alphanumeric, hyphen, underscore)
    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a coupon code.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 40 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// Codes are matched case-sensitively and exactly, so whitespace is
/// rejected here rather than silently trimmed: a code that would never
/// match anything is a caller bug.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_coupon_code;
///
/// assert!(validate_coupon_code("WELCOME10").is_ok());
/// assert!(validate_coupon_code("welcome10").is_ok()); // distinct coupon
/// assert!(validate_coupon_code(" WELCOME10").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 40 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 40,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Line                                                         │
/// │                                                                         │
/// │  Caller passes quantity: 5                                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: out of range                             │
/// │       │                                                                 │
/// │       └── OK → Proceed with add_line                                   │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount kind at coupon creation time.
///
/// ## Rules
/// - Fixed amounts must be non-negative
/// - Percentage rates are NOT capped at 100%: 15000 bps passes and will
///   apply literally, with the cart total floored at zero downstream
/// - `Unknown` cannot be created deliberately; it exists only for rows
///   decoded from storage
pub fn validate_discount_kind(kind: &DiscountKind) -> ValidationResult<()> {
    match kind {
        DiscountKind::Percentage { .. } => Ok(()),
        DiscountKind::Fixed { amount_cents } => {
            if *amount_cents < 0 {
                return Err(ValidationError::OutOfRange {
                    field: "discount amount".to_string(),
                    min: 0,
                    max: i64::MAX,
                });
            }
            Ok(())
        }
        DiscountKind::Unknown => Err(ValidationError::InvalidFormat {
            field: "discount type".to_string(),
            reason: "must be percentage or fixed".to_string(),
        }),
    }
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines).
///
/// ## Rules
/// - Must not exceed MAX_CART_LINES (100)
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        // Valid SKUs
        assert!(validate_sku("COKE-330").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        // Invalid SKUs
        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coca-Cola 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("WELCOME10").is_ok());
        assert!(validate_coupon_code("welcome10").is_ok());
        assert!(validate_coupon_code("BLACK-FRIDAY_26").is_ok());

        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code(" WELCOME10").is_err());
        assert!(validate_coupon_code("HAS SPACE").is_err());
        assert!(validate_coupon_code(&"X".repeat(41)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_discount_kind() {
        assert!(validate_discount_kind(&DiscountKind::Percentage { bps: 1000 }).is_ok());
        // Over 100% is allowed by policy; it applies literally downstream
        assert!(validate_discount_kind(&DiscountKind::Percentage { bps: 15000 }).is_ok());

        assert!(validate_discount_kind(&DiscountKind::Fixed { amount_cents: 500 }).is_ok());
        assert!(validate_discount_kind(&DiscountKind::Fixed { amount_cents: 0 }).is_ok());
        assert!(validate_discount_kind(&DiscountKind::Fixed { amount_cents: -1 }).is_err());

        assert!(validate_discount_kind(&DiscountKind::Unknown).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(99).is_ok());
        assert!(validate_cart_size(100).is_err());
    }
}
