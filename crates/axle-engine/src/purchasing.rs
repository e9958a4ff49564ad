//! # Purchase Order State Machine
//!
//! Governs supplier orders from draft through approval to receipt,
//! including reconciliation of ordered vs actually-received quantities.
//!
//! ## Purchase Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Purchase Order Lifecycle                             │
//! │                                                                         │
//! │  1. DRAFT                                                               │
//! │     └── create_purchase_order() / add_line() / set_line_quantity()      │
//! │         total_amount recomputed on every line mutation                  │
//! │                                                                         │
//! │  2. APPROVE                                                             │
//! │     └── approve() → Approved   (requires ≥1 line; no stock effect)      │
//! │                                                                         │
//! │  3. RECEIVE                                                             │
//! │     ├── auto_receive:  receive() → reconcile full quantities → Received │
//! │     └── manual:        receive() → editable ReceiptRecord               │
//! │                        confirm_receive() → reconcile → Received         │
//! │                        (until confirmed the order stays Approved and    │
//! │                         stock is untouched)                             │
//! │                                                                         │
//! │  4. CANCEL                                                              │
//! │     └── cancel()  [Draft|Approved only - Received is immutable]         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use axle_core::validation::{validate_quantity, validate_received_quantity};
use axle_core::{
    CoreError, Money, PurchaseLine, PurchaseOrder, PurchaseStatus, ReceiptRecord, Supplier,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::InventoryLedger;
use crate::reconcile::{process_receipt, ReconcileOutcome};

// =============================================================================
// Inputs & Outcomes
// =============================================================================

/// Caller input for one purchase line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPurchaseLine {
    pub product_id: String,
    pub quantity: i64,
    /// Agreed per-unit cost. Defaults to the product's purchase price.
    pub unit_price: Option<Money>,
}

/// Result of a `receive` call - which of the two receipt paths ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ReceiveOutcome {
    /// Auto path: full ordered quantities reconciled, order Received.
    Received {
        order: PurchaseOrder,
        reconciliation: ReconcileOutcome,
    },
    /// Manual path: the order is untouched (still Approved); the caller
    /// edits the receipt and submits it via `confirm_receive`.
    AwaitingConfirmation {
        order: PurchaseOrder,
        receipt: ReceiptRecord,
    },
}

// =============================================================================
// Purchase Service
// =============================================================================

/// The purchase order state machine service.
#[derive(Debug)]
pub struct PurchaseService {
    ledger: Arc<InventoryLedger>,
    config: EngineConfig,
    suppliers: Mutex<HashMap<String, Supplier>>,
    orders: Mutex<HashMap<String, PurchaseOrder>>,
}

impl PurchaseService {
    /// Creates a purchase service over the shared ledger.
    pub fn new(ledger: Arc<InventoryLedger>, config: EngineConfig) -> Self {
        PurchaseService {
            ledger,
            config,
            suppliers: Mutex::new(HashMap::new()),
            orders: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a supplier (or replaces its snapshot).
    pub fn register_supplier(&self, supplier: Supplier) {
        let mut suppliers = self.suppliers.lock().expect("suppliers mutex poisoned");
        suppliers.insert(supplier.id.clone(), supplier);
    }

    /// Returns a snapshot of a purchase order.
    pub fn get(&self, po_id: &str) -> EngineResult<PurchaseOrder> {
        let orders = self.orders.lock().expect("orders mutex poisoned");
        orders
            .get(po_id)
            .cloned()
            .ok_or_else(|| EngineError::PurchaseOrderNotFound(po_id.to_string()))
    }

    /// Creates a draft purchase order.
    ///
    /// Lines may be empty at this point; a draft is freely editable and
    /// only needs lines to leave Draft.
    pub fn create_purchase_order(
        &self,
        supplier_id: &str,
        expected_delivery: Option<DateTime<Utc>>,
        auto_receive: bool,
        notes: Option<String>,
        lines: Vec<NewPurchaseLine>,
    ) -> EngineResult<PurchaseOrder> {
        debug!(supplier_id = %supplier_id, auto_receive, lines = lines.len(), "create_purchase_order");

        {
            let suppliers = self.suppliers.lock().expect("suppliers mutex poisoned");
            match suppliers.get(supplier_id) {
                Some(supplier) if supplier.is_active => {}
                _ => return Err(EngineError::SupplierNotFound(supplier_id.to_string())),
            }
        }

        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            resolved.push(self.resolve_line(line)?);
        }

        let now = Utc::now();
        let mut order = PurchaseOrder {
            id: Uuid::new_v4().to_string(),
            supplier_id: supplier_id.to_string(),
            order_date: now,
            expected_delivery,
            auto_receive,
            notes,
            status: PurchaseStatus::Draft,
            lines: resolved,
            total_amount: Money::zero(),
            created_at: now,
            updated_at: now,
        };
        order.recompute_total();

        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        orders.insert(order.id.clone(), order.clone());

        info!(po_id = %order.id, supplier_id = %supplier_id, total = %order.total_amount, "Purchase order created");
        Ok(order)
    }

    /// Resolves caller input into a purchase line, snapshotting the SKU
    /// and defaulting the price to the product's purchase price.
    fn resolve_line(&self, line: NewPurchaseLine) -> EngineResult<PurchaseLine> {
        validate_quantity(line.quantity).map_err(CoreError::from)?;
        let product = self.ledger.product(&line.product_id)?;

        Ok(PurchaseLine {
            product_id: product.id,
            sku: product.sku,
            ordered_quantity: line.quantity,
            unit_price: line.unit_price.unwrap_or(product.purchase_price),
        })
    }

    // =========================================================================
    // Draft Editing
    // =========================================================================

    /// Adds a line to a draft order, merging into an existing line for the
    /// same product. `total_amount` is recomputed.
    pub fn add_line(&self, po_id: &str, line: NewPurchaseLine) -> EngineResult<PurchaseOrder> {
        let resolved = self.resolve_line(line)?;

        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = Self::editable(&mut orders, po_id)?;

        match order
            .lines
            .iter_mut()
            .find(|l| l.product_id == resolved.product_id)
        {
            Some(existing) => {
                existing.ordered_quantity += resolved.ordered_quantity;
                existing.unit_price = resolved.unit_price;
            }
            None => order.lines.push(resolved),
        }

        order.recompute_total();
        order.updated_at = Utc::now();
        debug!(po_id = %po_id, total = %order.total_amount, "Purchase line added");
        Ok(order.clone())
    }

    /// Sets the ordered quantity on a draft line. Zero or below removes
    /// the line. `total_amount` is recomputed.
    pub fn set_line_quantity(
        &self,
        po_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> EngineResult<PurchaseOrder> {
        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = Self::editable(&mut orders, po_id)?;

        if quantity <= 0 {
            let before = order.lines.len();
            order.lines.retain(|l| l.product_id != product_id);
            if order.lines.len() == before {
                return Err(CoreError::LineNotFound(product_id.to_string()).into());
            }
        } else {
            validate_quantity(quantity).map_err(CoreError::from)?;
            let line = order
                .lines
                .iter_mut()
                .find(|l| l.product_id == product_id)
                .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;
            line.ordered_quantity = quantity;
        }

        order.recompute_total();
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    /// Removes a line from a draft order. `total_amount` is recomputed.
    pub fn remove_line(&self, po_id: &str, product_id: &str) -> EngineResult<PurchaseOrder> {
        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = Self::editable(&mut orders, po_id)?;

        let before = order.lines.len();
        order.lines.retain(|l| l.product_id != product_id);
        if order.lines.len() == before {
            return Err(CoreError::LineNotFound(product_id.to_string()).into());
        }

        order.recompute_total();
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    /// Looks up an order and requires it to be editable (Draft).
    fn editable<'a>(
        orders: &'a mut HashMap<String, PurchaseOrder>,
        po_id: &str,
    ) -> EngineResult<&'a mut PurchaseOrder> {
        let order = orders
            .get_mut(po_id)
            .ok_or_else(|| EngineError::PurchaseOrderNotFound(po_id.to_string()))?;

        if order.status != PurchaseStatus::Draft {
            return Err(EngineError::OrderNotEditable {
                po_id: po_id.to_string(),
                status: order.status.as_str().to_string(),
            });
        }

        Ok(order)
    }

    // =========================================================================
    // Lifecycle Transitions
    // =========================================================================

    /// Approves a draft order, locking it for receiving. No stock effect.
    pub fn approve(&self, po_id: &str) -> EngineResult<PurchaseOrder> {
        debug!(po_id = %po_id, "approve");

        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = orders
            .get_mut(po_id)
            .ok_or_else(|| EngineError::PurchaseOrderNotFound(po_id.to_string()))?;

        if !order.status.can_transition(PurchaseStatus::Approved) {
            return Err(Self::invalid_transition(order, PurchaseStatus::Approved));
        }
        if order.lines.is_empty() {
            return Err(CoreError::EmptyOrder {
                entity: "PurchaseOrder",
            }
            .into());
        }

        order.status = PurchaseStatus::Approved;
        order.updated_at = Utc::now();

        info!(po_id = %po_id, total = %order.total_amount, "Purchase order approved");
        Ok(order.clone())
    }

    /// Receives an approved order.
    ///
    /// ## Two Paths
    /// - `auto_receive`: the full ordered quantities are reconciled
    ///   immediately and the order becomes Received.
    /// - manual: returns a pre-populated [`ReceiptRecord`] for the caller
    ///   to adjust; nothing changes until [`PurchaseService::confirm_receive`]
    ///   is called - receipt is never implicitly confirmed.
    pub fn receive(&self, po_id: &str) -> EngineResult<ReceiveOutcome> {
        debug!(po_id = %po_id, "receive");

        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = orders
            .get_mut(po_id)
            .ok_or_else(|| EngineError::PurchaseOrderNotFound(po_id.to_string()))?;

        if !order.status.can_transition(PurchaseStatus::Received) {
            return Err(Self::invalid_transition(order, PurchaseStatus::Received));
        }

        let receipt = ReceiptRecord::from_order(order);

        if !order.auto_receive {
            return Ok(ReceiveOutcome::AwaitingConfirmation {
                order: order.clone(),
                receipt,
            });
        }

        let reconciliation = process_receipt(&self.ledger, &order.supplier_id, &receipt)?;
        order.status = PurchaseStatus::Received;
        order.updated_at = Utc::now();

        info!(po_id = %po_id, batches = reconciliation.batches.len(), "Purchase order auto-received");
        Ok(ReceiveOutcome::Received {
            order: order.clone(),
            reconciliation,
        })
    }

    /// Confirms a manual receipt, reconciling the (possibly adjusted)
    /// quantities into stock and marking the order Received.
    ///
    /// Bounds are validated against the configured over-receipt tolerance
    /// before any stock moves; an out-of-tolerance line rejects the whole
    /// receipt and the order stays Approved.
    pub fn confirm_receive(
        &self,
        po_id: &str,
        receipt: &ReceiptRecord,
    ) -> EngineResult<(PurchaseOrder, ReconcileOutcome)> {
        debug!(po_id = %po_id, "confirm_receive");

        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = orders
            .get_mut(po_id)
            .ok_or_else(|| EngineError::PurchaseOrderNotFound(po_id.to_string()))?;

        if !order.status.can_transition(PurchaseStatus::Received) {
            return Err(Self::invalid_transition(order, PurchaseStatus::Received));
        }

        Self::check_receipt_shape(order, receipt)?;
        for line in &receipt.lines {
            validate_received_quantity(
                &line.sku,
                line.ordered_quantity,
                line.received_quantity,
                self.config.over_receipt_tolerance_bps,
            )?;
        }

        let reconciliation = process_receipt(&self.ledger, &order.supplier_id, receipt)?;
        order.status = PurchaseStatus::Received;
        order.updated_at = Utc::now();

        info!(
            po_id = %po_id,
            batches = reconciliation.batches.len(),
            has_discrepancy = reconciliation.has_discrepancy,
            "Purchase order received"
        );
        Ok((order.clone(), reconciliation))
    }

    /// Cancels a Draft or Approved order. No stock effect - no receipt
    /// happened yet. Received orders are immutable.
    pub fn cancel(&self, po_id: &str) -> EngineResult<PurchaseOrder> {
        debug!(po_id = %po_id, "cancel");

        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = orders
            .get_mut(po_id)
            .ok_or_else(|| EngineError::PurchaseOrderNotFound(po_id.to_string()))?;

        if !order.status.can_transition(PurchaseStatus::Cancelled) {
            return Err(Self::invalid_transition(order, PurchaseStatus::Cancelled));
        }

        order.status = PurchaseStatus::Cancelled;
        order.updated_at = Utc::now();

        info!(po_id = %po_id, "Purchase order cancelled");
        Ok(order.clone())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn invalid_transition(order: &PurchaseOrder, to: PurchaseStatus) -> EngineError {
        CoreError::InvalidTransition {
            entity: "PurchaseOrder",
            from: order.status.as_str().to_string(),
            to: to.as_str().to_string(),
        }
        .into()
    }

    /// Receipt lines must match the order's lines one-to-one, with the
    /// ordered quantities untampered. Only `received_quantity` (and the
    /// unit cost, for invoice corrections) is the caller's to edit.
    fn check_receipt_shape(order: &PurchaseOrder, receipt: &ReceiptRecord) -> EngineResult<()> {
        let mismatch = |reason: String| EngineError::ReceiptMismatch {
            po_id: order.id.clone(),
            reason,
        };

        if receipt.purchase_order_id != order.id {
            return Err(mismatch(format!(
                "receipt is for order {}",
                receipt.purchase_order_id
            )));
        }

        if receipt.lines.len() != order.lines.len() {
            return Err(mismatch(format!(
                "expected {} lines, got {}",
                order.lines.len(),
                receipt.lines.len()
            )));
        }

        for po_line in &order.lines {
            let receipt_line = receipt
                .lines
                .iter()
                .find(|l| l.product_id == po_line.product_id)
                .ok_or_else(|| mismatch(format!("missing product {}", po_line.product_id)))?;

            if receipt_line.ordered_quantity != po_line.ordered_quantity {
                return Err(mismatch(format!(
                    "ordered quantity for {} changed from {} to {}",
                    po_line.sku, po_line.ordered_quantity, receipt_line.ordered_quantity
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
