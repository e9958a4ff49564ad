//! # Engine Error Types
//!
//! Errors raised by the stateful engine layer. Business rule violations
//! from axle-core pass through unchanged via `#[from]`; this crate adds
//! only the failures that need engine state to detect (lookups, receipt
//! shape mismatches, unsettled payments).

use thiserror::Error;

use axle_core::CoreError;

// =============================================================================
// Engine Error
// =============================================================================

/// Errors from ledger and state machine operations.
///
/// Every variant is recoverable at the caller: the aggregate the operation
/// targeted is left unchanged on failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Product is not registered in the inventory ledger.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Supplier is not registered or inactive.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Sale does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Purchase order does not exist.
    #[error("Purchase order not found: {0}")]
    PurchaseOrderNotFound(String),

    /// Stock batch does not exist on the given product.
    #[error("Batch {batch_id} not found for product {product_id}")]
    BatchNotFound {
        product_id: String,
        batch_id: String,
    },

    /// A counter (POS/OTC) sale cannot complete until payment settles.
    #[error("Sale {sale_id} payment is not settled; cannot complete")]
    PaymentNotSettled { sale_id: String },

    /// Line edits are only legal while a purchase order is a draft.
    #[error("Purchase order {po_id} is {status}; lines can only be edited in draft")]
    OrderNotEditable { po_id: String, status: String },

    /// A submitted receipt does not line up with the purchase order.
    ///
    /// ## When This Occurs
    /// - Receipt references a different purchase order
    /// - Receipt lines don't match the order's lines one-to-one
    /// - Ordered quantity on a receipt line was tampered with
    #[error("Receipt does not match purchase order {po_id}: {reason}")]
    ReceiptMismatch { po_id: String, reason: String },

    /// Business rule violation from axle-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
