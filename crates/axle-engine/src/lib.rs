//! # Axle Engine
//!
//! The stateful retail engine: inventory ledger, sale and purchase state
//! machines, and receipt reconciliation. Pure business rules live in
//! `axle-core`; this crate adds the state that outlives a single call and
//! the concurrency control around it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         axle-engine                                      │
//! │                                                                         │
//! │   SaleService ──────────┐                    ┌────── PurchaseService    │
//! │   (sales.rs)            │                    │       (purchasing.rs)    │
//! │     reserve/release     │                    │  receive/confirm_receive │
//! │                         ▼                    ▼                          │
//! │                   InventoryLedger ◄── process_receipt                   │
//! │                   (ledger.rs)          (reconcile.rs)                   │
//! │                                                                         │
//! │   per-product locking: RwLock<HashMap<_, Arc<Mutex<StockRecord>>>>      │
//! │   cross-product operations resolve every row before touching any        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - `config`: runtime tunables ([`EngineConfig`])
//! - `ledger`: stock levels and batches with per-product atomicity
//! - `sales`: channel-aware sale lifecycle plus the payment track
//! - `purchasing`: draft/approve/receive/cancel purchase lifecycle
//! - `reconcile`: receipt lines → stock batches
//! - `error`: [`EngineError`] / [`EngineResult`]

pub mod config;
pub mod error;
pub mod ledger;
pub mod purchasing;
pub mod reconcile;
pub mod sales;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use ledger::InventoryLedger;
pub use purchasing::{NewPurchaseLine, PurchaseService, ReceiveOutcome};
pub use reconcile::{process_receipt, ReconcileOutcome};
pub use sales::{SaleAction, SaleService};
