//! # Validation Module
//!
//! Field-level validation rules for the Store Ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host UI                                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository operation (ledger-store)                          │
//! │  ├── THIS MODULE: field rules on drafts/patches                        │
//! │  └── Uniqueness checks against the live collection                     │
//! │                                                                         │
//! │  A failure at layer 2 returns a ValidationError and leaves no          │
//! │  partial write.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Monetary cross-validation (`total` vs. `items`) is deliberately absent:
//! the trust boundary for those figures sits with the caller.

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field: non-blank after trimming, bounded length.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates a shop name.
pub fn validate_shop_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, 200)
}

/// Validates a store number (e.g., "DT001").
pub fn validate_store_number(store_number: &str) -> ValidationResult<()> {
    validate_required_text("storeNumber", store_number, 50)
}

/// Validates a shop address.
pub fn validate_address(address: &str) -> ValidationResult<()> {
    validate_required_text("address", address, 500)
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, 200)
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use ledger_core::validation::validate_sku;
///
/// assert!(validate_sku("OM001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    validate_required_text("sku", sku, 50)?;

    if !sku
        .trim()
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

/// Validates a category label.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_required_text("category", category, 100)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount (price, cost, total, paid, balance).
///
/// ## Rules
/// - Must be finite (NaN/infinity never reach the durable format)
/// - Must be non-negative; zero is allowed (free items, settled balances)
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level. Zero is allowed (out of stock).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Validates a sale line-item quantity. Must be strictly positive; how much
/// stock the quantity actually depletes is decided later (clamped at 0).
pub fn validate_line_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
