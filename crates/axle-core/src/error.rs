//! # Error Types
//!
//! Domain-specific error types for axle-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  axle-core errors (this file)                                           │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  axle-engine errors (separate crate)                                    │
//! │  └── EngineError      - Lookup failures + wrapped CoreError             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → caller (API layer)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, quantities, states)
//! 3. Errors are enum variants, never String
//! 4. Every failure leaves the aggregate unchanged - errors are recoverable

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are always
/// per-operation and recoverable: the cart/sale/order they were raised
/// against is left exactly as it was before the call.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity exceeds available stock.
    ///
    /// ## When This Occurs
    /// - Adding a cart line (existing + requested > stock)
    /// - Raising a line quantity past the stock snapshot
    /// - Sale creation revalidation against live ledger stock
    ///
    /// Never silently clamped for sales - the caller decides what to do.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Requested state change is not reachable from the current state.
    ///
    /// ## When This Occurs
    /// - `completed → processing` on a sale
    /// - `receive` on a draft purchase order
    /// - Cancelling a received purchase order
    #[error("{entity} cannot move from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// Attempt to approve or check out with zero lines.
    #[error("{entity} has no line items")]
    EmptyOrder { entity: &'static str },

    /// Discount is negative or a percentage above 100%.
    #[error("Invalid discount: {reason}")]
    InvalidDiscount { reason: String },

    /// Received quantity is outside the over-receipt tolerance.
    ///
    /// The excess is rejected, never truncated: the supplier dispute has
    /// to be resolved before the receipt can be confirmed.
    #[error(
        "Received quantity {received} for {sku} is outside tolerance (ordered {ordered}, max {max})"
    )]
    ReceiptOutOfTolerance {
        sku: String,
        ordered: i64,
        received: i64,
        max: i64,
    },

    /// Cart line for the given product does not exist.
    #[error("Product {0} is not in the cart")]
    LineNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid SKU characters, unknown status string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
