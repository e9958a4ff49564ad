//! # Reconciliation Processor
//!
//! Converts a purchase order's received line items into inventory batches
//! and stock increases. The shared sub-routine behind both receipt paths:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Receipt Paths                                       │
//! │                                                                         │
//! │  receive(po)                                                            │
//! │    ├── auto_receive = true ──► received := ordered ─┐                   │
//! │    │                                                ▼                   │
//! │    │                                      process_receipt()             │
//! │    │                                      (THIS MODULE)                 │
//! │    │                                                ▲                   │
//! │    └── auto_receive = false ─► editable receipt ────┘                   │
//! │                                (confirm_receive)                        │
//! │                                                                         │
//! │  process_receipt: one StockBatch per line with received > 0,            │
//! │  stock += received. Atomic per purchase order.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantity bounds are validated by the purchase machine before the
//! processor runs; by the time a receipt reaches here it is shape-checked
//! and within tolerance.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use axle_core::{ReceiptRecord, StockBatch};

use crate::error::EngineResult;
use crate::ledger::InventoryLedger;

// =============================================================================
// Reconcile Outcome
// =============================================================================

/// Result of reconciling one receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Batches created, one per line with `received_quantity > 0`.
    pub batches: Vec<StockBatch>,
    /// True when any line's received quantity differed from what was
    /// ordered. Surfaced for caller-side reporting; never blocks the
    /// receipt.
    pub has_discrepancy: bool,
}

// =============================================================================
// Processor
// =============================================================================

/// Applies a receipt to the inventory ledger.
///
/// ## Guarantees
/// - One new Active `StockBatch` per line with `received_quantity > 0`
///   (`quantity_received == quantity_remaining == received_quantity`)
/// - Product stock incremented by exactly `received_quantity` per line
/// - Zero-quantity lines produce nothing (supplier shorted the line)
/// - Atomic: a failure creates no partial batches
pub fn process_receipt(
    ledger: &InventoryLedger,
    supplier_id: &str,
    receipt: &ReceiptRecord,
) -> EngineResult<ReconcileOutcome> {
    debug!(
        po_id = %receipt.purchase_order_id,
        supplier_id = %supplier_id,
        lines = receipt.lines.len(),
        "Reconciling receipt"
    );

    for line in &receipt.lines {
        if line.has_discrepancy() {
            warn!(
                po_id = %receipt.purchase_order_id,
                sku = %line.sku,
                ordered = line.ordered_quantity,
                received = line.received_quantity,
                "Receipt discrepancy"
            );
        }
    }

    let batches = ledger.receive_batches(supplier_id, &receipt.lines)?;
    let has_discrepancy = receipt.has_discrepancy();

    info!(
        po_id = %receipt.purchase_order_id,
        batches = batches.len(),
        has_discrepancy,
        "Receipt reconciled"
    );

    Ok(ReconcileOutcome {
        batches,
        has_discrepancy,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
