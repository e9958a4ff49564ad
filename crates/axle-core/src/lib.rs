//! # axle-core: Pure Business Logic for the Axle Retail Core
//!
//! This crate is the **heart** of the system. It contains all business
//! logic as pure functions and value objects with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Axle Retail Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          API / UI / Storage collaborators (out of scope)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    axle-engine (stateful)                        │   │
//! │  │    Inventory ledger • sale machine • purchase machine            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ axle-core (THIS CRATE) ★                         │   │
//! │  │                                                                  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐    │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│    │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   rules   │    │   │
//! │  │   │   Sale    │  │  bps math │  │ CartLine  │  │  checks   │    │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘    │   │
//! │  │                                                                  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, PurchaseOrder, StockBatch, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart/pricing engine for draft transactions
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paisa (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use axle_core::Money` instead of
// `use axle_core::money::Money`

pub use cart::{Cart, CartLine, CartTotals, Discount};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line in a cart or purchase order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Can be made configurable per-store in future versions.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum discount percentage in basis points (100%).
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Default over-receipt tolerance in basis points (10%).
///
/// A supplier may deliver slightly more than ordered; receipts accept up to
/// `ordered × 1.1` by default. The business origin of the 10% figure is
/// unclear, so it is a configurable default rather than a hardcoded rule
/// (see `axle-engine`'s `EngineConfig`).
pub const DEFAULT_OVER_RECEIPT_TOLERANCE_BPS: u32 = 1_000;
