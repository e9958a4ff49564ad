//! # Sale Transaction State Machine
//!
//! Governs a sale's lifecycle across channels, its independent payment
//! track, and stock commitment/rollback.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (any channel)                                                │
//! │     └── create_sale(cart) → Sale { status: Reserved }                   │
//! │         stock decremented per line (the reservation is committed,       │
//! │         not implicitly reversible)                                      │
//! │                                                                         │
//! │  2. FULFIL (online) or COMPLETE (POS/OTC after payment)                 │
//! │     └── transition(Processing) → transition(Ship) → transition(Complete)│
//! │     └── transition(Complete)   [counter channels, payment settled]      │
//! │                                                                         │
//! │  3. REVERSE                                                             │
//! │     └── transition(Cancel)  [Reserved/Processing] → stock restored      │
//! │     └── transition(Return)  [Completed]           → stock restored      │
//! │                                                                         │
//! │  Payment runs on its own track: confirm_payment(Pending → Completed     │
//! │  or Failed), consulted only at counter completion.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use axle_core::{
    Cart, Channel, CoreError, PaymentMethod, PaymentStatus, Sale, SaleLine, SaleStatus,
};

use crate::error::{EngineError, EngineResult};
use crate::ledger::InventoryLedger;

// =============================================================================
// Sale Action
// =============================================================================

/// A requested lifecycle transition.
///
/// Actions name the movement, not the implementation: the target status
/// and its legality per channel live in [`SaleStatus::can_transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleAction {
    /// Online order picked up for packing.
    StartProcessing,
    /// Online order handed to the courier.
    Ship,
    /// Finalize the sale.
    Complete,
    /// Abandon before completion; restores stock.
    Cancel,
    /// Reverse a completed sale; restores stock.
    Return,
}

impl SaleAction {
    /// The status this action requests.
    pub fn target(&self) -> SaleStatus {
        match self {
            SaleAction::StartProcessing => SaleStatus::Processing,
            SaleAction::Ship => SaleStatus::Shipped,
            SaleAction::Complete => SaleStatus::Completed,
            SaleAction::Cancel => SaleStatus::Cancelled,
            SaleAction::Return => SaleStatus::Returned,
        }
    }
}

// =============================================================================
// Sale Service
// =============================================================================

/// The sale state machine service.
///
/// Holds the only mutable reference to the sale aggregates; callers get
/// snapshots back from every operation. Stock effects go through the
/// shared [`InventoryLedger`].
#[derive(Debug)]
pub struct SaleService {
    ledger: Arc<InventoryLedger>,
    sales: Mutex<HashMap<String, Sale>>,
}

impl SaleService {
    /// Creates a sale service over the shared ledger.
    pub fn new(ledger: Arc<InventoryLedger>) -> Self {
        SaleService {
            ledger,
            sales: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a snapshot of a sale.
    pub fn get(&self, sale_id: &str) -> EngineResult<Sale> {
        let sales = self.sales.lock().expect("sales mutex poisoned");
        sales
            .get(sale_id)
            .cloned()
            .ok_or_else(|| EngineError::SaleNotFound(sale_id.to_string()))
    }

    /// Creates a sale from a draft cart, reserving stock.
    ///
    /// ## What This Does
    /// 1. Rejects empty carts (`EmptyOrder`)
    /// 2. Revalidates and reserves every line against live ledger stock -
    ///    the cart's own snapshots are not trusted at commit time
    /// 3. Computes totals via the pricing engine
    /// 4. Stores the sale as `Reserved` with payment `Pending`
    ///
    /// A failed line rolls back the lines already reserved; the ledger is
    /// unchanged when this returns an error.
    pub fn create_sale(
        &self,
        channel: Channel,
        customer_id: Option<String>,
        cart: &Cart,
        payment_method: PaymentMethod,
    ) -> EngineResult<Sale> {
        debug!(?channel, lines = cart.line_count(), "create_sale");

        if cart.is_empty() {
            return Err(CoreError::EmptyOrder { entity: "Sale" }.into());
        }

        // Reserve line by line; the per-product row lock makes each
        // reservation an atomic read-validate-write.
        let mut reserved: Vec<(&str, i64)> = Vec::with_capacity(cart.lines.len());
        for line in &cart.lines {
            if let Err(err) = self.ledger.reserve(&line.product_id, line.quantity) {
                for (product_id, quantity) in reserved {
                    // Rows cannot disappear, so the rollback cannot fail.
                    let _ = self.ledger.release(product_id, quantity);
                }
                return Err(err);
            }
            reserved.push((&line.product_id, line.quantity));
        }

        let totals = cart.totals();
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            channel,
            customer_id,
            lines: cart
                .lines
                .iter()
                .map(|line| SaleLine {
                    product_id: line.product_id.clone(),
                    sku: line.sku.clone(),
                    name: line.name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    line_discount: line.line_discount,
                })
                .collect(),
            subtotal: totals.subtotal,
            discount: totals.discount,
            total: totals.total,
            payment_method,
            payment_status: PaymentStatus::Pending,
            status: SaleStatus::Reserved,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        let mut sales = self.sales.lock().expect("sales mutex poisoned");
        sales.insert(sale.id.clone(), sale.clone());

        info!(sale_id = %sale.id, ?channel, total = %sale.total, lines = sale.lines.len(), "Sale created");
        Ok(sale)
    }

    /// Requests a lifecycle transition.
    ///
    /// ## Rules
    /// - Requesting the current status is a no-op (returns the sale
    ///   unchanged, not an error)
    /// - Targets unreachable from the current status per the channel's
    ///   table are `InvalidTransition`
    /// - Counter (POS/OTC) completion requires settled payment
    /// - `Cancel`/`Return` restore the reserved quantities to the ledger
    pub fn transition(&self, sale_id: &str, action: SaleAction) -> EngineResult<Sale> {
        let target = action.target();
        debug!(sale_id = %sale_id, ?action, "transition");

        let mut sales = self.sales.lock().expect("sales mutex poisoned");
        let sale = sales
            .get_mut(sale_id)
            .ok_or_else(|| EngineError::SaleNotFound(sale_id.to_string()))?;

        // Idempotence: re-requesting the current state changes nothing.
        if sale.status == target {
            return Ok(sale.clone());
        }

        if !sale.status.can_transition(sale.channel, target) {
            return Err(CoreError::InvalidTransition {
                entity: "Sale",
                from: sale.status.as_str().to_string(),
                to: target.as_str().to_string(),
            }
            .into());
        }

        if target == SaleStatus::Completed
            && sale.channel.is_counter()
            && sale.payment_status != PaymentStatus::Completed
        {
            return Err(EngineError::PaymentNotSettled {
                sale_id: sale_id.to_string(),
            });
        }

        if target.releases_stock() {
            for line in &sale.lines {
                self.ledger.release(&line.product_id, line.quantity)?;
            }
        }

        let now = Utc::now();
        sale.status = target;
        sale.updated_at = now;
        if target == SaleStatus::Completed {
            sale.completed_at = Some(now);
        }

        info!(sale_id = %sale_id, status = sale.status.as_str(), "Sale transitioned");
        Ok(sale.clone())
    }

    /// Moves the payment track: `Pending → Completed | Failed`.
    ///
    /// Orthogonal to the sale status. Confirming the value already set is
    /// a no-op; any other change off a settled track is invalid.
    pub fn confirm_payment(&self, sale_id: &str, status: PaymentStatus) -> EngineResult<Sale> {
        debug!(sale_id = %sale_id, ?status, "confirm_payment");

        let mut sales = self.sales.lock().expect("sales mutex poisoned");
        let sale = sales
            .get_mut(sale_id)
            .ok_or_else(|| EngineError::SaleNotFound(sale_id.to_string()))?;

        if sale.payment_status == status {
            return Ok(sale.clone());
        }

        if sale.payment_status != PaymentStatus::Pending || status == PaymentStatus::Pending {
            return Err(CoreError::InvalidTransition {
                entity: "Payment",
                from: sale.payment_status.as_str().to_string(),
                to: status.as_str().to_string(),
            }
            .into());
        }

        sale.payment_status = status;
        sale.updated_at = Utc::now();

        info!(sale_id = %sale_id, payment_status = ?sale.payment_status, "Payment confirmed");
        Ok(sale.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
