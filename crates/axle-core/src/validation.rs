//! # Validation Module
//!
//! Input validation for the retail core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API layer (out of scope)                                      │
//! │  ├── Shape/type validation (deserialization)                            │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Aggregate invariants (cart, state machines, ledger)           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::cart::Discount;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::{MAX_DISCOUNT_BPS, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use axle_core::validation::validate_sku;
///
/// assert!(validate_sku("BRK-PAD-TYT").is_ok());
/// assert!(validate_sku("").is_err());
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
/// - Must be at most 200 characters
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

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (guards against fat-finger entries
///   like 1000 instead of 10)
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

/// Validates a price in paisa.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free items)
pub fn validate_price(paisa: i64) -> ValidationResult<()> {
    if paisa < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Discount Validator
// =============================================================================

/// Validates a discount before it is attached to a cart.
///
/// ## Rules
/// - Fixed amounts must be non-negative
/// - Percentages must be at most 100% (10000 bps)
pub fn validate_discount(discount: &Discount) -> CoreResult<()> {
    match discount {
        Discount::Fixed(amount) if amount.is_negative() => Err(CoreError::InvalidDiscount {
            reason: format!("fixed amount {amount} is negative"),
        }),
        Discount::Percentage(bps) if *bps > MAX_DISCOUNT_BPS => Err(CoreError::InvalidDiscount {
            reason: format!("percentage {}bps exceeds 100%", bps),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Receipt Validator
// =============================================================================

/// Maximum received quantity allowed for a purchase line.
///
/// `ordered × (1 + tolerance)`, computed in integer math and truncated
/// toward zero. With the default 1000 bps tolerance, ordered 100 → max 110.
#[inline]
pub fn max_received_quantity(ordered: i64, tolerance_bps: u32) -> i64 {
    (ordered as i128 * (10_000 + tolerance_bps as i128) / 10_000) as i64
}

/// Validates a received quantity against the over-receipt tolerance.
///
/// ## Rules
/// - Must be non-negative (zero = supplier shorted the line entirely)
/// - Must not exceed `ordered × (1 + tolerance)`; the excess is rejected,
///   never silently truncated
pub fn validate_received_quantity(
    sku: &str,
    ordered: i64,
    received: i64,
    tolerance_bps: u32,
) -> CoreResult<()> {
    if received < 0 {
        return Err(ValidationError::OutOfRange {
            field: "received_quantity".to_string(),
            min: 0,
            max: max_received_quantity(ordered, tolerance_bps),
        }
        .into());
    }

    let max = max_received_quantity(ordered, tolerance_bps);
    if received > max {
        return Err(CoreError::ReceiptOutOfTolerance {
            sku: sku.to_string(),
            ordered,
            received,
            max,
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
    use crate::money::Money;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("BRK-PAD-TYT").is_ok());
        assert!(validate_sku("OILFILTER_20").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Brake Pad Set (Front)").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(109_900).is_ok());
        assert!(validate_price(-100).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(&Discount::Fixed(Money::from_paisa(500))).is_ok());
        assert!(validate_discount(&Discount::Fixed(Money::zero())).is_ok());
        assert!(validate_discount(&Discount::Percentage(10_000)).is_ok());

        assert!(validate_discount(&Discount::Fixed(Money::from_paisa(-1))).is_err());
        assert!(validate_discount(&Discount::Percentage(10_001)).is_err());
    }

    #[test]
    fn test_max_received_quantity() {
        // 10% tolerance: ordered 100 → max 110.
        assert_eq!(max_received_quantity(100, 1000), 110);
        // Truncates toward zero: 15 × 1.1 = 16.5 → 16.
        assert_eq!(max_received_quantity(15, 1000), 16);
        // Zero tolerance: exact quantities only.
        assert_eq!(max_received_quantity(100, 0), 100);
    }

    #[test]
    fn test_validate_received_quantity() {
        assert!(validate_received_quantity("SKU", 100, 0, 1000).is_ok());
        assert!(validate_received_quantity("SKU", 100, 90, 1000).is_ok());
        assert!(validate_received_quantity("SKU", 100, 110, 1000).is_ok());

        assert!(validate_received_quantity("SKU", 100, -1, 1000).is_err());
        let err = validate_received_quantity("SKU", 100, 111, 1000).unwrap_err();
        assert!(matches!(err, CoreError::ReceiptOutOfTolerance { max: 110, .. }));
    }
}
