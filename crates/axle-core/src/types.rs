//! # Domain Types
//!
//! Core domain types for the Axle retail core.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │      Sale       │   │  PurchaseOrder  │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │        │
//! │  │  sku (business) │   │  channel        │   │  supplier_id    │        │
//! │  │  stock_quantity │   │  status         │   │  status         │        │
//! │  │  selling_price  │   │  payment_status │   │  auto_receive   │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │   StockBatch    │   │   SaleStatus    │   │ PurchaseStatus  │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  qty_received   │   │  Reserved       │   │  Draft          │        │
//! │  │  qty_remaining  │   │  ... Completed  │   │  ... Received   │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business ID where one exists (sku, receipt number) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale and purchase.
///
/// `stock_quantity` is derived state: increased only by reconciled purchase
/// receipts, decreased only by sale reservations, restored by cancellations
/// and returns. Nothing else touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Unit cost when buying from a supplier.
    pub purchase_price: Money,

    /// Unit price when selling to a customer.
    pub selling_price: Money,

    /// Current stock level. Derived; see type docs.
    pub stock_quantity: i64,

    /// Stock level at or below which the product should be reordered.
    pub reorder_level: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether `quantity` more units can be taken from stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// Checks whether stock has fallen to or below the reorder level.
    #[inline]
    pub fn needs_reorder(&self) -> bool {
        self.stock_quantity <= self.reorder_level
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier that purchase orders are placed against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}

// =============================================================================
// Stock Batch
// =============================================================================

/// The status of a stock batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Batch still has sellable units.
    Active,
    /// Every unit has been consumed by sales.
    Depleted,
    /// Batch was written off; remaining units are not sellable.
    Expired,
}

impl BatchStatus {
    /// Lowercase wire name, matching the serde encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Active => "active",
            BatchStatus::Depleted => "depleted",
            BatchStatus::Expired => "expired",
        }
    }
}

/// A discrete received lot of a product with its own cost and remaining
/// quantity, enabling FIFO cost-layer tracking.
///
/// ## Creation
/// Batches are created exclusively by the reconciliation processor when a
/// purchase order receipt is confirmed. Sales consume them oldest-first.
///
/// ## Invariant
/// For any product: Σ `quantity_remaining` over its Active batches equals
/// the product's `stock_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockBatch {
    pub id: String,
    pub product_id: String,
    pub supplier_id: String,
    /// Units received when the batch was created. Never changes.
    pub quantity_received: i64,
    /// Units not yet consumed by sales.
    pub quantity_remaining: i64,
    /// Per-unit cost paid to the supplier.
    pub unit_cost: Money,
    pub received_date: DateTime<Utc>,
    pub status: BatchStatus,
}

impl StockBatch {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == BatchStatus::Active
    }

    /// Consumes up to `quantity` units, returning how many were taken.
    /// Marks the batch Depleted when it hits zero.
    pub fn consume(&mut self, quantity: i64) -> i64 {
        let taken = quantity.min(self.quantity_remaining);
        self.quantity_remaining -= taken;
        if self.quantity_remaining == 0 {
            self.status = BatchStatus::Depleted;
        }
        taken
    }

    /// Puts up to `quantity` previously consumed units back, returning how
    /// many fit. Reactivates a Depleted batch. Expired batches never take
    /// units back.
    pub fn restore(&mut self, quantity: i64) -> i64 {
        if self.status == BatchStatus::Expired {
            return 0;
        }
        let space = self.quantity_received - self.quantity_remaining;
        let returned = quantity.min(space);
        self.quantity_remaining += returned;
        if self.quantity_remaining > 0 {
            self.status = BatchStatus::Active;
        }
        returned
    }
}

// =============================================================================
// Sales Channel
// =============================================================================

/// The sales origin.
///
/// Represented as an enum with channel-specific transition tables, never as
/// string comparisons scattered through the logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// In-store point-of-sale register.
    Pos,
    /// Web storefront order.
    Online,
    /// Manual over-the-counter entry.
    Otc,
}

impl Channel {
    /// Counter channels (POS/OTC) complete immediately after payment and
    /// never pass through fulfilment states.
    #[inline]
    pub fn is_counter(&self) -> bool {
        matches!(self, Channel::Pos | Channel::Otc)
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The lifecycle status of a sale.
///
/// ## Lifecycle
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Online:   Reserved → Processing → Shipped → Completed → Returned       │
/// │                 │          │                                             │
/// │                 └──────────┴────► Cancelled                             │
/// │                                                                         │
/// │  POS/OTC:  Reserved ──────────────────────► Completed → Returned        │
/// │                 │                                                        │
/// │                 └────► Cancelled                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
/// Stock is decremented at `Reserved` (reservation); `Cancelled` and
/// `Returned` restore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Stock provisionally committed; sale awaiting payment/fulfilment.
    Reserved,
    /// Online order being picked/packed.
    Processing,
    /// Online order handed to the courier.
    Shipped,
    /// Sale finalized. Total is immutable from here on.
    Completed,
    /// Completed sale reversed; stock restored.
    Returned,
    /// Sale abandoned before completion; stock restored.
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Reserved
    }
}

impl SaleStatus {
    /// Normalizes a raw persisted status into a canonical value.
    ///
    /// Legacy rows use `NULL`, `""`, `"pending"` and `"reserved"`
    /// interchangeably for "not yet processed". They all collapse to
    /// [`SaleStatus::Reserved`] here, at the load boundary, so the core
    /// never branches on null-versus-empty-versus-named states.
    pub fn from_raw(raw: Option<&str>) -> Option<SaleStatus> {
        match raw.map(str::trim).unwrap_or("") {
            "" | "pending" | "reserved" => Some(SaleStatus::Reserved),
            "processing" => Some(SaleStatus::Processing),
            "shipped" => Some(SaleStatus::Shipped),
            "completed" => Some(SaleStatus::Completed),
            "returned" => Some(SaleStatus::Returned),
            "cancelled" => Some(SaleStatus::Cancelled),
            _ => None,
        }
    }

    /// Lowercase wire name, matching the serde encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Reserved => "reserved",
            SaleStatus::Processing => "processing",
            SaleStatus::Shipped => "shipped",
            SaleStatus::Completed => "completed",
            SaleStatus::Returned => "returned",
            SaleStatus::Cancelled => "cancelled",
        }
    }

    /// Whether `self → to` is a legal transition for the given channel.
    ///
    /// Same-state "transitions" are handled by the caller as no-ops and do
    /// not need to be legal here.
    pub fn can_transition(&self, channel: Channel, to: SaleStatus) -> bool {
        use SaleStatus::*;

        match (self, to) {
            // Fulfilment track exists only for online orders.
            (Reserved, Processing) | (Processing, Shipped) | (Shipped, Completed) => {
                channel == Channel::Online
            }
            // Counter sales complete directly after payment confirmation.
            (Reserved, Completed) => channel.is_counter(),
            // Abandonment before goods leave the store.
            (Reserved, Cancelled) | (Processing, Cancelled) => true,
            // Terminal reversal.
            (Completed, Returned) => true,
            _ => false,
        }
    }

    /// Statuses whose reserved stock has been handed back.
    #[inline]
    pub fn releases_stock(&self) -> bool {
        matches!(self, SaleStatus::Cancelled | SaleStatus::Returned)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Payment settlement status, tracked independently of the sale status.
///
/// An online order may be `Processing` while payment is still `Pending`
/// (cash on delivery); a counter sale must have `Completed` payment before
/// the sale itself can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl PaymentStatus {
    /// Lowercase wire name, matching the serde encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash at the counter.
    Cash,
    /// Card payment on an external terminal or gateway.
    Card,
    /// Direct bank transfer.
    BankTransfer,
    /// Cash collected by the courier on delivery.
    CashOnDelivery,
}

// =============================================================================
// Sale
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern to freeze product data at reservation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub sku: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    /// Quantity sold.
    pub quantity: i64,
    /// Discount applied to this line.
    pub line_discount: Money,
}

impl SaleLine {
    /// Line total after the line discount, floored at zero.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price
            .multiply_quantity(self.quantity)
            .saturating_sub_floor_zero(self.line_discount)
    }
}

/// A sale transaction across any channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub channel: Channel,
    /// Nullable for walk-in customers.
    pub customer_id: Option<String>,
    pub lines: Vec<SaleLine>,
    pub subtotal: Money,
    /// Order-level discount, resolved to an amount at creation.
    pub discount: Money,
    /// `max(0, subtotal - discount)`. Immutable once Completed.
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Purchase Order
// =============================================================================

/// The lifecycle status of a purchase order.
///
/// ## Lifecycle
/// ```text
/// Draft → Approved → Received        (terminal)
///   │         │
///   └─────────┴────► Cancelled       (terminal)
/// ```
/// Received orders are immutable: the goods arrived, the batches exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// Lines freely editable; total recomputed on every mutation.
    Draft,
    /// Locked for receiving. No stock effect yet.
    Approved,
    /// Goods reconciled into stock batches.
    Received,
    /// Abandoned before any goods arrived.
    Cancelled,
}

impl Default for PurchaseStatus {
    fn default() -> Self {
        PurchaseStatus::Draft
    }
}

impl PurchaseStatus {
    /// Lowercase wire name, matching the serde encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Draft => "draft",
            PurchaseStatus::Approved => "approved",
            PurchaseStatus::Received => "received",
            PurchaseStatus::Cancelled => "cancelled",
        }
    }

    /// Whether `self → to` is a legal transition.
    pub fn can_transition(&self, to: PurchaseStatus) -> bool {
        use PurchaseStatus::*;

        matches!(
            (self, to),
            (Draft, Approved) | (Approved, Received) | (Draft, Cancelled) | (Approved, Cancelled)
        )
    }
}

/// A line on a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub product_id: String,
    /// SKU at order time (frozen).
    pub sku: String,
    pub ordered_quantity: i64,
    /// Agreed per-unit cost.
    pub unit_price: Money,
}

impl PurchaseLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.ordered_quantity)
    }
}

/// A supplier purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    pub supplier_id: String,
    pub order_date: DateTime<Utc>,
    pub expected_delivery: Option<DateTime<Utc>>,
    /// When set, `receive` books the full ordered quantities immediately
    /// instead of surfacing an editable receipt for manual confirmation.
    pub auto_receive: bool,
    pub notes: Option<String>,
    pub status: PurchaseStatus,
    pub lines: Vec<PurchaseLine>,
    /// Σ line qty × price. Recomputed on every draft edit.
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Recomputes `total_amount` from the lines. Called after every draft
    /// line mutation.
    pub fn recompute_total(&mut self) {
        self.total_amount = self
            .lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total());
    }
}

// =============================================================================
// Receipt Record
// =============================================================================

/// One line of a receipt: what was ordered vs what actually arrived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: String,
    pub sku: String,
    pub ordered_quantity: i64,
    /// Editable by the caller on the manual path, bounded to
    /// `[0, ordered × (1 + tolerance)]`. Zero means the supplier shorted
    /// the line entirely.
    pub received_quantity: i64,
    pub unit_cost: Money,
}

impl ReceiptLine {
    /// A discrepancy is any mismatch between ordered and received.
    #[inline]
    pub fn has_discrepancy(&self) -> bool {
        self.received_quantity != self.ordered_quantity
    }
}

/// Transient receipt for a purchase order. Produced at receive time,
/// consumed by `confirm_receive`; never persisted as its own entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub purchase_order_id: String,
    pub lines: Vec<ReceiptLine>,
}

impl ReceiptRecord {
    /// Pre-populates a receipt from a purchase order with
    /// `received_quantity = ordered_quantity` on every line.
    pub fn from_order(order: &PurchaseOrder) -> Self {
        ReceiptRecord {
            purchase_order_id: order.id.clone(),
            lines: order
                .lines
                .iter()
                .map(|line| ReceiptLine {
                    product_id: line.product_id.clone(),
                    sku: line.sku.clone(),
                    ordered_quantity: line.ordered_quantity,
                    received_quantity: line.ordered_quantity,
                    unit_cost: line.unit_price,
                })
                .collect(),
        }
    }

    /// True when any line's received quantity differs from what was
    /// ordered. Reported to the caller; never blocks confirmation.
    pub fn has_discrepancy(&self) -> bool {
        self.lines.iter().any(ReceiptLine::has_discrepancy)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Reserved);
    }

    #[test]
    fn test_status_normalization() {
        assert_eq!(SaleStatus::from_raw(None), Some(SaleStatus::Reserved));
        assert_eq!(SaleStatus::from_raw(Some("")), Some(SaleStatus::Reserved));
        assert_eq!(SaleStatus::from_raw(Some("  ")), Some(SaleStatus::Reserved));
        assert_eq!(
            SaleStatus::from_raw(Some("pending")),
            Some(SaleStatus::Reserved)
        );
        assert_eq!(
            SaleStatus::from_raw(Some("shipped")),
            Some(SaleStatus::Shipped)
        );
        assert_eq!(SaleStatus::from_raw(Some("bogus")), None);
    }

    #[test]
    fn test_online_transition_table() {
        use SaleStatus::*;

        assert!(Reserved.can_transition(Channel::Online, Processing));
        assert!(Processing.can_transition(Channel::Online, Shipped));
        assert!(Shipped.can_transition(Channel::Online, Completed));
        assert!(Completed.can_transition(Channel::Online, Returned));
        assert!(Processing.can_transition(Channel::Online, Cancelled));

        // Online orders never skip fulfilment.
        assert!(!Reserved.can_transition(Channel::Online, Completed));
        // No going backwards.
        assert!(!Completed.can_transition(Channel::Online, Processing));
        // Shipped goods cannot be cancelled, only returned after completion.
        assert!(!Shipped.can_transition(Channel::Online, Cancelled));
    }

    #[test]
    fn test_counter_transition_table() {
        use SaleStatus::*;

        for channel in [Channel::Pos, Channel::Otc] {
            assert!(Reserved.can_transition(channel, Completed));
            assert!(Reserved.can_transition(channel, Cancelled));
            assert!(Completed.can_transition(channel, Returned));

            // Counter sales have no fulfilment track.
            assert!(!Reserved.can_transition(channel, Processing));
            assert!(!Reserved.can_transition(channel, Shipped));
        }
    }

    #[test]
    fn test_purchase_transition_table() {
        use PurchaseStatus::*;

        assert!(Draft.can_transition(Approved));
        assert!(Approved.can_transition(Received));
        assert!(Draft.can_transition(Cancelled));
        assert!(Approved.can_transition(Cancelled));

        // Received orders are immutable.
        assert!(!Received.can_transition(Cancelled));
        assert!(!Received.can_transition(Draft));
        // No skipping approval.
        assert!(!Draft.can_transition(Received));
    }

    #[test]
    fn test_batch_consume_and_restore() {
        let mut batch = StockBatch {
            id: "b1".to_string(),
            product_id: "p1".to_string(),
            supplier_id: "s1".to_string(),
            quantity_received: 10,
            quantity_remaining: 10,
            unit_cost: Money::from_paisa(500),
            received_date: Utc::now(),
            status: BatchStatus::Active,
        };

        assert_eq!(batch.consume(4), 4);
        assert_eq!(batch.quantity_remaining, 6);
        assert_eq!(batch.status, BatchStatus::Active);

        // Consuming past remaining takes only what is there.
        assert_eq!(batch.consume(10), 6);
        assert_eq!(batch.status, BatchStatus::Depleted);

        // Restore reactivates and is capped at quantity_received.
        assert_eq!(batch.restore(12), 10);
        assert_eq!(batch.quantity_remaining, 10);
        assert_eq!(batch.status, BatchStatus::Active);
    }

    #[test]
    fn test_expired_batch_rejects_restore() {
        let mut batch = StockBatch {
            id: "b1".to_string(),
            product_id: "p1".to_string(),
            supplier_id: "s1".to_string(),
            quantity_received: 10,
            quantity_remaining: 2,
            unit_cost: Money::from_paisa(500),
            received_date: Utc::now(),
            status: BatchStatus::Expired,
        };

        assert_eq!(batch.restore(5), 0);
        assert_eq!(batch.quantity_remaining, 2);
        assert_eq!(batch.status, BatchStatus::Expired);
    }

    #[test]
    fn test_purchase_order_total_recompute() {
        let mut order = PurchaseOrder {
            id: "po1".to_string(),
            supplier_id: "s1".to_string(),
            order_date: Utc::now(),
            expected_delivery: None,
            auto_receive: false,
            notes: None,
            status: PurchaseStatus::Draft,
            lines: vec![
                PurchaseLine {
                    product_id: "p1".to_string(),
                    sku: "SKU-1".to_string(),
                    ordered_quantity: 50,
                    unit_price: Money::from_rupees(10),
                },
                PurchaseLine {
                    product_id: "p2".to_string(),
                    sku: "SKU-2".to_string(),
                    ordered_quantity: 2,
                    unit_price: Money::from_rupees(250),
                },
            ],
            total_amount: Money::zero(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        order.recompute_total();
        assert_eq!(order.total_amount, Money::from_rupees(1000));
    }

    #[test]
    fn test_receipt_record_prepopulation() {
        let order = PurchaseOrder {
            id: "po1".to_string(),
            supplier_id: "s1".to_string(),
            order_date: Utc::now(),
            expected_delivery: None,
            auto_receive: false,
            notes: None,
            status: PurchaseStatus::Approved,
            lines: vec![PurchaseLine {
                product_id: "p1".to_string(),
                sku: "SKU-1".to_string(),
                ordered_quantity: 100,
                unit_price: Money::from_rupees(10),
            }],
            total_amount: Money::from_rupees(1000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut receipt = ReceiptRecord::from_order(&order);
        assert_eq!(receipt.lines[0].received_quantity, 100);
        assert!(!receipt.has_discrepancy());

        receipt.lines[0].received_quantity = 90;
        assert!(receipt.has_discrepancy());
    }

    #[test]
    fn test_as_str_matches_wire_encoding() {
        // Error messages and logs must show the same strings the storage
        // collaborator persists.
        for status in [
            SaleStatus::Reserved,
            SaleStatus::Processing,
            SaleStatus::Shipped,
            SaleStatus::Completed,
            SaleStatus::Returned,
            SaleStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for status in [
            BatchStatus::Active,
            BatchStatus::Depleted,
            BatchStatus::Expired,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for status in [
            PurchaseStatus::Draft,
            PurchaseStatus::Approved,
            PurchaseStatus::Received,
            PurchaseStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_status_wire_encoding() {
        // The storage collaborator persists these exact strings.
        let json = serde_json::to_string(&SaleStatus::Reserved).unwrap();
        assert_eq!(json, "\"reserved\"");

        let json = serde_json::to_string(&PurchaseStatus::Received).unwrap();
        assert_eq!(json, "\"received\"");

        let channel: Channel = serde_json::from_str("\"otc\"").unwrap();
        assert_eq!(channel, Channel::Otc);

        let method: PaymentMethod = serde_json::from_str("\"cash_on_delivery\"").unwrap();
        assert_eq!(method, PaymentMethod::CashOnDelivery);
    }
}
